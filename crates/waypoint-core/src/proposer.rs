//! The planner port: turns a free-text goal into a proposed step graph.
//!
//! Implementations wrap whatever produces plans (an LLM, a template library,
//! a file on disk). Proposals are untrusted: the planner validates them before
//! anything is stored. The trait is object-safe so it can be held as
//! `Arc<dyn PlanProposer>`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    models::{DependencyMap, PlanRisk, PlanStrategy, ProblemAnalysis},
    params::{CreateDetailedPlan, NewStep},
};

/// A raw plan as returned by a proposer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposedPlan {
    /// Analysis of the goal; `None` lets the planner run its own heuristic
    #[serde(default)]
    pub analysis: Option<ProblemAnalysis>,
    /// Chosen strategy; `None` lets the planner suggest one
    #[serde(default)]
    pub strategy: Option<PlanStrategy>,
    pub steps: Vec<NewStep>,
    #[serde(default)]
    pub dependencies: DependencyMap,
    #[serde(default)]
    pub risks: Vec<PlanRisk>,
}

impl ProposedPlan {
    /// Attach the goal, filling analysis and strategy heuristically when the
    /// proposer left them out.
    pub fn into_request(self, goal: &str) -> CreateDetailedPlan {
        let analysis = self
            .analysis
            .unwrap_or_else(|| crate::analyzer::analyze_goal(goal));
        let strategy = self
            .strategy
            .unwrap_or_else(|| crate::analyzer::suggest_strategy(&analysis));

        CreateDetailedPlan {
            goal: goal.to_string(),
            analysis,
            strategy,
            steps: self.steps,
            dependencies: self.dependencies,
            risks: self.risks,
        }
    }
}

/// Source of plans for free-text goals.
#[async_trait]
pub trait PlanProposer: Send + Sync {
    /// Human-readable name of the proposer, used in logs.
    fn name(&self) -> &str;

    /// Propose a step graph for `goal`. `context` carries whatever the caller
    /// knows about the surroundings (open files, repository notes).
    async fn propose(&self, goal: &str, context: &str) -> Result<ProposedPlan>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlanProposer) {}
};
