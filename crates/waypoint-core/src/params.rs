//! Parameter structures for planner operations
//!
//! These structures are shared across interfaces (the CLI, plan files, the
//! planner port) and carry no framework-specific derives beyond serde, so
//! every front end can build them the same way.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   Plan files    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde / JSON)  │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{
    DependencyMap, PlanRisk, PlanStrategy, ProblemAnalysis, Step, StepStatus, StepType,
};

/// Parameters for building a strictly linear plan from step titles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSimplePlan {
    /// Goal the plan works towards
    pub goal: String,
    /// Step titles, in execution order
    pub titles: Vec<String>,
}

/// Description of a step that does not belong to a plan yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewStep {
    /// Identifier, unique within the plan
    pub id: String,
    /// Brief title/summary of the step
    pub title: String,
    /// Optional detailed description of the step
    #[serde(default)]
    pub description: Option<String>,
    /// Kind of work the step performs
    #[serde(default)]
    pub step_type: StepType,
    /// Estimated token cost
    #[serde(default)]
    pub estimated_tokens: u64,
    /// Whether the step may run alongside others in its level
    #[serde(default)]
    pub parallelizable: bool,
    /// How to undo the step
    #[serde(default)]
    pub rollback: Option<String>,
    /// How to tell the step is done
    #[serde(default)]
    pub verification: String,
}

impl NewStep {
    /// A step with only an id and a title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Turn the description into a pending step at the given position.
    pub fn into_step(self, order: u32) -> Step {
        Step {
            id: self.id,
            order,
            title: self.title,
            description: self.description,
            step_type: self.step_type,
            estimated_tokens: self.estimated_tokens,
            parallelizable: self.parallelizable,
            rollback: self.rollback,
            verification: self.verification,
            status: StepStatus::Pending,
            result: None,
            error: None,
            updated_at: Timestamp::now(),
        }
    }
}

/// Parameters for creating a plan with an arbitrary dependency graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDetailedPlan {
    /// Goal the plan works towards
    pub goal: String,
    /// Scope and complexity classification
    #[serde(default)]
    pub analysis: ProblemAnalysis,
    /// Chosen execution strategy
    #[serde(default)]
    pub strategy: PlanStrategy,
    /// Steps, in order
    pub steps: Vec<NewStep>,
    /// Step id mapped to the ids it depends on
    #[serde(default)]
    pub dependencies: DependencyMap,
    /// Known risks
    #[serde(default)]
    pub risks: Vec<PlanRisk>,
}
