//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::validation::PlanValidation;

/// One-line outcome of an operation, such as a validation verdict.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl From<&PlanValidation> for OperationStatus {
    fn from(validation: &PlanValidation) -> Self {
        match validation.errors.len() {
            0 => Self::success("plan is valid"),
            1 => Self::failure("plan has 1 problem"),
            n => Self::failure(format!("plan has {n} problems")),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}
