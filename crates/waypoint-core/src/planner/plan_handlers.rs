//! Read-only planner queries and statistics.
//!
//! Queries hand out clones; the store keeps the canonical plans. A miss is
//! `None` (or an empty collection), never an error.

use super::Planner;
use crate::{
    display::PlanSummaries,
    models::{Plan, PlanFilter, PlanStats, PlanStatus, PlanSummary, Step},
    validation::PlanValidation,
};

impl Planner {
    /// Retrieves a plan by its ID.
    pub fn get_plan(&self, plan_id: u64) -> Option<Plan> {
        self.lock().store.get(plan_id).cloned()
    }

    /// Plans matching the filter, in id order.
    pub fn list_plans(&self, filter: &PlanFilter) -> Vec<Plan> {
        self.lock().store.list(filter).into_iter().cloned().collect()
    }

    /// Handle listing plans as summaries with step counts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use waypoint_core::{PlannerBuilder, models::PlanFilter, params::CreateSimplePlan};
    /// let planner = PlannerBuilder::new().build();
    /// planner
    ///     .create_simple_plan(&CreateSimplePlan {
    ///         goal: "Fix a typo".to_string(),
    ///         titles: vec!["Fix it".to_string()],
    ///     })
    ///     .unwrap();
    ///
    /// let summaries = planner.list_plans_summary(&PlanFilter::default());
    /// assert_eq!(summaries.len(), 1);
    /// assert_eq!(summaries[0].pending_steps, 1);
    /// ```
    pub fn list_plans_summary(&self, filter: &PlanFilter) -> PlanSummaries {
        let state = self.lock();
        let summaries: Vec<PlanSummary> =
            state.store.list(filter).into_iter().map(Into::into).collect();
        PlanSummaries(summaries)
    }

    /// The plan currently in progress, if any.
    pub fn active_plan(&self) -> Option<Plan> {
        let state = self.lock();
        state.active_plan.and_then(|id| state.store.get(id)).cloned()
    }

    /// Steps of the plan that can start right now.
    pub fn get_ready_steps(&self, plan_id: u64) -> Option<Vec<Step>> {
        let state = self.lock();
        let plan = state.store.get(plan_id)?;
        Some(plan.get_ready_steps().into_iter().cloned().collect())
    }

    /// Steps of the plan grouped into dependency levels.
    pub fn get_parallelizable_steps(&self, plan_id: u64) -> Option<Vec<Vec<Step>>> {
        let state = self.lock();
        let plan = state.store.get(plan_id)?;
        let levels = plan
            .get_parallelizable_steps()
            .into_iter()
            .map(|level| level.into_iter().cloned().collect())
            .collect();
        Some(levels)
    }

    /// Fraction of resolved steps in the plan.
    pub fn progress(&self, plan_id: u64) -> Option<f64> {
        self.lock().store.get(plan_id).map(Plan::progress)
    }

    pub fn validate_plan(&self, plan_id: u64) -> Option<PlanValidation> {
        self.lock().store.get(plan_id).map(Plan::validate)
    }

    /// Whether the plan exists, has a valid graph and can still change.
    pub fn is_executable(&self, plan_id: u64) -> bool {
        self.lock()
            .store
            .get(plan_id)
            .is_some_and(|plan| !plan.is_terminal() && plan.validate().is_valid)
    }

    /// Counts of stored plans per status.
    pub fn get_stats(&self) -> PlanStats {
        self.lock().store.iter().collect()
    }

    /// Number of plans in the given status.
    pub fn count_in_status(&self, status: PlanStatus) -> usize {
        self.lock().store.list(&PlanFilter::with_status(status)).len()
    }
}
