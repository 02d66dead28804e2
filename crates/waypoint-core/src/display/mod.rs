//! Display formatting for plans, steps and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! newtype wrappers add context-specific formatting for collections and
//! operation outcomes. Everything renders as markdown, which the CLI passes
//! through its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Markdown      │
//! │  (Plan, Step)   │───▶│ Result Types    │───▶│    Output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrappers (PlanSummaries, Steps, Levels)
//! - [`results`]: Operation results (CreateResult, UpdateResult)
//! - [`status`]: One-line outcomes (OperationStatus)
//! - [`datetime`]: Local time rendering
//! - [`models`]: Display implementations for domain models and events
//!
//! ## Usage Examples
//!
//! ```rust
//! use waypoint_core::display::OperationStatus;
//!
//! let status = OperationStatus::failure("plan has 2 problems");
//! assert_eq!(status.to_string(), "Error: plan has 2 problems\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{Levels, PlanSummaries, Steps};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, UpdateResult};
pub use status::OperationStatus;
