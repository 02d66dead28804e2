//! Error types for the planning engine.

use thiserror::Error;

/// Comprehensive error type for all engine operations.
///
/// Unknown plan or step identifiers are deliberately absent from this enum:
/// lookups that miss are reported as `Ok(None)` or an empty collection.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The dependency graph failed structural validation
    #[error("Invalid plan: {}", errors.join("; "))]
    InvalidPlan { errors: Vec<String> },
    /// A lifecycle call was made from a state that does not allow it
    #[error("Cannot {action} {entity} '{id}' while it is {from}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        action: &'static str,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The external planner failed to produce a plan
    #[error("Planner proposal failed: {source}")]
    Proposer {
        #[source]
        source: anyhow::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl EngineError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a transition error for a plan.
    pub fn plan_transition(
        id: u64,
        from: impl std::fmt::Display,
        action: &'static str,
    ) -> Self {
        Self::InvalidTransition {
            entity: "plan",
            id: id.to_string(),
            from: from.to_string(),
            action,
        }
    }

    /// Creates a transition error for a step.
    pub fn step_transition(
        id: impl Into<String>,
        from: impl std::fmt::Display,
        action: &'static str,
    ) -> Self {
        Self::InvalidTransition {
            entity: "step",
            id: id.into(),
            from: from.to_string(),
            action,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
