//! Filter types for querying plans.

use super::{Plan, PlanStatus};

/// Filter options for querying plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Filter by plan status
    pub status: Option<PlanStatus>,

    /// Filter by goal text (case-insensitive partial match)
    pub goal_contains: Option<String>,
}

impl PlanFilter {
    /// Filter matching plans in a single status.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::models::{PlanFilter, PlanStatus};
    ///
    /// let filter = PlanFilter::with_status(PlanStatus::Failed);
    /// assert_eq!(filter.status, Some(PlanStatus::Failed));
    /// assert!(filter.goal_contains.is_none());
    /// ```
    pub fn with_status(status: PlanStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Whether the plan passes every configured condition.
    pub fn matches(&self, plan: &Plan) -> bool {
        let status_matches = self.status.is_none_or(|status| plan.status == status);
        let goal_matches = self.goal_contains.as_ref().is_none_or(|needle| {
            plan.goal.to_lowercase().contains(&needle.to_lowercase())
        });
        status_matches && goal_matches
    }
}
