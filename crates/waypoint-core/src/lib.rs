//! Core library for the Waypoint planning engine.
//!
//! Waypoint turns a goal into an explicit dependency graph of steps, checks
//! the graph, and drives plan and step state while an external executor does
//! the actual work.
//!
//! - **Graph model** ([`models`]): plans, steps and the pure graph queries
//!   (readiness, dependency levels, progress)
//! - **Validation** ([`validation`]): cycles, unknown references, duplicate
//!   ids
//! - **Lifecycle engine** ([`planner`]): creation, transitions, execution and
//!   statistics over an in-memory [`store`]
//! - **Heuristics** ([`analyzer`]): keyword-based scope and complexity
//!   classification
//! - **Events** ([`events`]): synchronous notifications on every change
//! - **Planner port** ([`proposer`]): async source of proposed plans
//! - **Display** ([`display`]): markdown rendering of all of the above
//!
//! # Quick Start
//!
//! ```rust
//! use waypoint_core::{
//!     PlannerBuilder,
//!     models::{PlanFilter, PlanStatus},
//!     params::CreateSimplePlan,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_listener(|event| println!("{event}"))
//!     .build();
//!
//! let plan = planner.create_simple_plan(&CreateSimplePlan {
//!     goal: "Add retry to the HTTP client".to_string(),
//!     titles: vec!["Write tests".to_string(), "Implement retry".to_string()],
//! })?;
//! planner.approve_plan(plan.id)?;
//! planner.start_plan(plan.id)?;
//!
//! while let Some(step) = planner.start_next_step(plan.id)? {
//!     planner.complete_step(plan.id, &step.id, None)?;
//! }
//!
//! let done = planner.list_plans(&PlanFilter::with_status(PlanStatus::Completed));
//! assert_eq!(done.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod analyzer;
pub mod display;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod planner;
pub mod proposer;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use display::{CreateResult, Levels, OperationStatus, PlanSummaries, Steps, UpdateResult};
pub use error::{EngineError, Result};
pub use events::{ListenerId, PlanEvent};
pub use models::{
    DependencyMap, Plan, PlanFilter, PlanStats, PlanStatus, PlanSummary, Step, StepStatus,
    StepType,
};
pub use params::{CreateDetailedPlan, CreateSimplePlan, NewStep};
pub use planner::{Planner, PlannerBuilder};
pub use proposer::{PlanProposer, ProposedPlan};
pub use validation::PlanValidation;
