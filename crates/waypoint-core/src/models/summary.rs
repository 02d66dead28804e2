//! Plan summary and aggregate statistics types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Plan, PlanStatus};

/// Summary information about a plan with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan ID
    pub id: u64,
    /// Goal of the plan
    pub goal: String,
    /// Plan status
    pub status: PlanStatus,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of completed steps
    pub completed_steps: u32,
    /// Number of skipped steps
    pub skipped_steps: u32,
    /// Number of steps not yet resolved
    pub pending_steps: u32,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        let total_steps = plan.steps.len() as u32;
        let completed_steps = plan.completed_count() as u32;
        let resolved_steps = plan.resolved_count() as u32;

        Self {
            id: plan.id,
            goal: plan.goal.clone(),
            status: plan.status,
            created_at: plan.created_at,
            total_steps,
            completed_steps,
            skipped_steps: resolved_steps - completed_steps,
            pending_steps: total_steps - resolved_steps,
        }
    }
}

/// Counts of stored plans per status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanStats {
    pub total: usize,
    pub draft: usize,
    pub approved: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// `completed / (completed + failed)`, 0.0 when neither exists
    pub success_rate: f64,
}

impl<'a> FromIterator<&'a Plan> for PlanStats {
    fn from_iter<I: IntoIterator<Item = &'a Plan>>(plans: I) -> Self {
        let mut stats = PlanStats::default();
        for plan in plans {
            stats.total += 1;
            match plan.status {
                PlanStatus::Draft => stats.draft += 1,
                PlanStatus::Approved => stats.approved += 1,
                PlanStatus::InProgress => stats.in_progress += 1,
                PlanStatus::Completed => stats.completed += 1,
                PlanStatus::Failed => stats.failed += 1,
                PlanStatus::Cancelled => stats.cancelled += 1,
            }
        }

        let judged = stats.completed + stats.failed;
        if judged > 0 {
            stats.success_rate = stats.completed as f64 / judged as f64;
        }
        stats
    }
}
