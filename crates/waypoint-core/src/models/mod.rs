//! Data models for plans and steps.
//!
//! A [`Plan`] owns an ordered list of [`Step`]s plus a dependency map between
//! them. All models are plain data (serde-serializable, no embedded behavior
//! beyond pure queries) so that an external store can persist them.
//!
//! Models are updated functionally: `with_*` methods return new values and
//! never mutate in place. The planner swaps the new value into the
//! [`crate::store::PlanStore`] as a single step.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{Step, StepStatus};
//!
//! let step = Step::new("1", 0, "Add parser");
//! let started = step.with_status(StepStatus::InProgress);
//!
//! assert_eq!(step.status, StepStatus::Pending);
//! println!("{}", started); // Shows ➤ In Progress status icon
//! ```

pub mod analysis;
pub mod estimate;
pub mod filters;
pub mod plan;
pub mod risk;
pub mod status;
pub mod step;
pub mod strategy;
pub mod summary;


pub use analysis::{Complexity, ProblemAnalysis, Scope};
pub use estimate::EffortEstimate;
pub use filters::PlanFilter;
pub use plan::{DependencyMap, Plan};
pub use risk::{Impact, PlanRisk, RiskLevel};
pub use status::{PlanStatus, StepStatus, StepType};
pub use step::Step;
pub use strategy::{AlternativeApproach, Approach, PlanStrategy};
pub use summary::{PlanStats, PlanSummary};
