//! Builder for creating and configuring Planner instances.

use std::sync::Arc;

use super::Planner;
use crate::{
    events::{EventBus, PlanEvent},
    proposer::PlanProposer,
};

type BoxedListener = Box<dyn Fn(&PlanEvent) + Send + Sync>;

/// Builder for creating and configuring Planner instances.
#[derive(Default)]
pub struct PlannerBuilder {
    proposer: Option<Arc<dyn PlanProposer>>,
    listeners: Vec<BoxedListener>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings: no proposer, no
    /// listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proposer used by [`Planner::create_plan`].
    ///
    /// Without one, `create_plan` fails with a configuration error; the
    /// direct creation methods keep working.
    pub fn with_proposer<P: PlanProposer + 'static>(self, proposer: P) -> Self {
        self.with_shared_proposer(Arc::new(proposer))
    }

    /// Sets a proposer that is shared with other owners.
    pub fn with_shared_proposer(mut self, proposer: Arc<dyn PlanProposer>) -> Self {
        self.proposer = Some(proposer);
        self
    }

    /// Registers a listener before the first event can be emitted.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&PlanEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Builds the configured planner instance.
    pub fn build(self) -> Planner {
        let events = EventBus::new();
        for listener in self.listeners {
            events.add_listener(listener);
        }
        if let Some(proposer) = &self.proposer {
            log::debug!("planner configured with proposer '{}'", proposer.name());
        }
        Planner::new(events, self.proposer)
    }
}

impl std::fmt::Debug for PlannerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerBuilder")
            .field("proposer", &self.proposer.as_ref().map(|p| p.name()))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
