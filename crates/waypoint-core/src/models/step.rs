//! Step model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{StepStatus, StepType};

/// Represents an individual step within a plan.
///
/// Steps are values: status changes go through the `with_*` methods, which
/// return an updated copy and leave the original untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Identifier, unique within the owning plan
    pub id: String,

    /// Order hint of the step within the plan (0-indexed)
    pub order: u32,

    /// Brief title/summary of the step
    pub title: String,

    /// Detailed multi-line description of the step
    pub description: Option<String>,

    /// Kind of work the step performs
    #[serde(default)]
    pub step_type: StepType,

    /// Estimated token cost of carrying out the step
    #[serde(default)]
    pub estimated_tokens: u64,

    /// Whether the step may run alongside others in its level
    #[serde(default)]
    pub parallelizable: bool,

    /// How to undo the step if needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<String>,

    /// How to tell the step is done
    #[serde(default)]
    pub verification: String,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Output reported when the step completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Error reported when the step failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Timestamp when the step was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Step {
    /// Creates a pending step with default metadata.
    pub fn new(id: impl Into<String>, order: u32, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order,
            title: title.into(),
            description: None,
            step_type: StepType::default(),
            estimated_tokens: 0,
            parallelizable: false,
            rollback: None,
            verification: String::new(),
            status: StepStatus::Pending,
            result: None,
            error: None,
            updated_at: Timestamp::now(),
        }
    }

    /// Returns a copy of this step with a new status.
    pub fn with_status(&self, status: StepStatus) -> Self {
        Self {
            status,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }

    /// Returns a completed copy of this step carrying its output.
    pub fn completed(&self, output: Option<String>) -> Self {
        Self {
            result: output,
            ..self.with_status(StepStatus::Completed)
        }
    }

    /// Returns a failed copy of this step carrying the error.
    pub fn failed(&self, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..self.with_status(StepStatus::Failed)
        }
    }
}
