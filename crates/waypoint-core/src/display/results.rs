//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::Plan;

/// Wrapper type for displaying a freshly created plan.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{PlannerBuilder, display::CreateResult, params::CreateSimplePlan};
///
/// let planner = PlannerBuilder::new().build();
/// let plan = planner
///     .create_simple_plan(&CreateSimplePlan {
///         goal: "Rename the config module".to_string(),
///         titles: vec!["Rename".to_string()],
///     })
///     .unwrap();
///
/// let output = CreateResult::new(plan).to_string();
/// assert!(output.starts_with("Created plan with ID: 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying a plan after a series of changes.
///
/// The changes are listed above the plan so the reader sees what happened
/// before the resulting state.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated plan with ID: {} ({})",
            self.resource.id, self.resource.status
        )?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}
