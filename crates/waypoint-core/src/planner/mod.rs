//! High-level planner API: the lifecycle engine.
//!
//! The [`Planner`] owns the [`PlanStore`], tracks the active plan, drives the
//! plan and step state machines, and dispatches [`PlanEvent`]s.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │   Plan store    │
//! │ (plan_handlers) │───▶│ (plan_ops,      │───▶│  (in memory)    │
//! │                 │    │  step_ops)      │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!       Queries            State changes          Canonical plans
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`plan_ops`]: Plan creation and plan-level transitions
//! - [`step_ops`]: Step execution and graph modification
//! - [`plan_handlers`]: Read-only queries and statistics
//!
//! ## Concurrency
//!
//! All state sits behind one mutex, so every call is linearizable. Each state
//! change computes a complete new [`Plan`] from the current one, swaps it
//! into the store and queues its events before the lock is released. The
//! events are delivered after the lock is dropped, still in commit order, so
//! listeners may query or even mutate the planner. The only `.await` point is
//! the planner port in [`Planner::create_plan`], and the lock is never held
//! across it.
//!
//! # Usage Examples
//!
//! ```rust
//! use waypoint_core::{PlannerBuilder, params::CreateSimplePlan};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build();
//!
//! let plan = planner.create_simple_plan(&CreateSimplePlan {
//!     goal: "Add a config file".to_string(),
//!     titles: vec!["Design schema".to_string(), "Implement loader".to_string()],
//! })?;
//!
//! planner.approve_plan(plan.id)?;
//! planner.start_plan(plan.id)?;
//!
//! let step = planner.start_next_step(plan.id)?.expect("first step is ready");
//! planner.complete_step(plan.id, &step.id, Some("schema.json written".to_string()))?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::{
    error::Result,
    events::{EventBus, ListenerId, PlanEvent},
    models::Plan,
    proposer::PlanProposer,
    store::PlanStore,
};

// Module declarations
pub mod builder;
pub mod plan_handlers;
pub mod plan_ops;
pub mod step_ops;

#[cfg(test)]
mod tests;

// Re-export the main types
pub use builder::PlannerBuilder;

/// Everything guarded by the planner's lock.
#[derive(Debug, Default)]
pub(crate) struct PlannerState {
    pub(crate) store: PlanStore,
    pub(crate) active_plan: Option<u64>,
}

/// A new plan value plus the events describing how it got there.
pub(crate) struct Change {
    pub(crate) plan: Plan,
    pub(crate) events: Vec<PlanEvent>,
}

/// Main planner interface for managing plans and steps.
pub struct Planner {
    state: Mutex<PlannerState>,
    events: EventBus,
    proposer: Option<Arc<dyn PlanProposer>>,
}

impl Planner {
    /// Creates a new planner around an event bus and an optional proposer.
    pub(crate) fn new(events: EventBus, proposer: Option<Arc<dyn PlanProposer>>) -> Self {
        Self {
            state: Mutex::new(PlannerState::default()),
            events,
            proposer,
        }
    }

    /// Register a synchronous event listener.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PlanEvent) + Send + Sync + 'static,
    {
        self.events.add_listener(listener)
    }

    /// Unregister a listener. Returns whether it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a change to one stored plan.
    ///
    /// `change` sees the current value and returns the replacement, `None`
    /// for an unknown step, or an error. Nothing is stored unless it
    /// succeeds. Unknown plans yield `Ok(None)` without calling `change`.
    pub(crate) fn update_plan<F>(&self, plan_id: u64, change: F) -> Result<Option<Plan>>
    where
        F: FnOnce(&Plan) -> Result<Option<Change>>,
    {
        let mut state = self.lock();
        let Some(current) = state.store.get(plan_id) else {
            debug!("plan {plan_id} not found");
            return Ok(None);
        };
        let Some(Change { plan, events }) = change(current)? else {
            return Ok(None);
        };

        state.store.replace(plan.clone());
        // A start replaces the active plan even when it completes at once.
        if events
            .iter()
            .any(|event| matches!(event, PlanEvent::PlanStarted { .. }))
        {
            state.active_plan = Some(plan_id);
        }
        if plan.is_terminal() && state.active_plan == Some(plan_id) {
            state.active_plan = None;
        }

        self.events.enqueue(events);
        drop(state);
        self.events.flush();
        Ok(Some(plan))
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("events", &self.events)
            .field(
                "proposer",
                &self.proposer.as_ref().map(|proposer| proposer.name()),
            )
            .finish_non_exhaustive()
    }
}
