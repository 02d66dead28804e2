//! Status and kind enumerations for plans and steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a plan.
///
/// ```text
/// Draft --approve--> Approved --start--> InProgress --> Completed | Failed
///   \___________________\_____________________\--cancel--> Cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan has been created but not reviewed
    #[default]
    Draft,

    /// Plan has been approved for execution
    Approved,

    /// Plan is being executed
    InProgress,

    /// Every step was completed or skipped
    Completed,

    /// A step failed and the plan was stopped
    Failed,

    /// Plan was cancelled before it finished
    Cancelled,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "approved" => Ok(PlanStatus::Approved),
            "inprogress" | "in_progress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            "failed" => Ok(PlanStatus::Failed),
            "cancelled" | "canceled" => Ok(PlanStatus::Cancelled),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Approved => "approved",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
            PlanStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the plan has reached an outcome and accepts no more changes.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlanStatus::Completed | PlanStatus::Failed | PlanStatus::Cancelled
        )
    }
}

/// Lifecycle status of a single step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is waiting to be picked up
    #[default]
    Pending,

    /// Step is being worked on
    InProgress,

    /// Step has been completed
    Completed,

    /// Step failed
    Failed,

    /// Step was skipped; counts as resolved for its dependents
    Skipped,

    /// Step is waiting on an unmet dependency
    Blocked,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "inprogress" | "in_progress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            "skipped" => Ok(StepStatus::Skipped),
            "blocked" => Ok(StepStatus::Blocked),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
            StepStatus::Blocked => "blocked",
        }
    }

    /// Completed and skipped steps no longer hold back their dependents.
    pub fn is_resolved(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Failed => "✗ Failed",
            StepStatus::Skipped => "↷ Skipped",
            StepStatus::Blocked => "⏸ Blocked",
        }
    }
}

/// The kind of work a step performs.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Research,
    Design,
    #[default]
    Implement,
    Test,
    Refactor,
    Document,
    Verify,
    Cleanup,
}

impl StepType {
    /// All step types in declaration order.
    pub const ALL: [StepType; 8] = [
        StepType::Research,
        StepType::Design,
        StepType::Implement,
        StepType::Test,
        StepType::Refactor,
        StepType::Document,
        StepType::Verify,
        StepType::Cleanup,
    ];

    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Research => "research",
            StepType::Design => "design",
            StepType::Implement => "implement",
            StepType::Test => "test",
            StepType::Refactor => "refactor",
            StepType::Document => "document",
            StepType::Verify => "verify",
            StepType::Cleanup => "cleanup",
        }
    }

    /// Baseline duration of a step of this kind, in minutes.
    pub fn base_minutes(&self) -> u32 {
        match self {
            StepType::Research => 10,
            StepType::Design => 15,
            StepType::Implement => 20,
            StepType::Test => 10,
            StepType::Refactor => 15,
            StepType::Document | StepType::Verify | StepType::Cleanup => 5,
        }
    }
}

impl FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid step type: {s}"))
    }
}
