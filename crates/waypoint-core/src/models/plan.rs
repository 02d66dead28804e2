//! Plan model definition and the graph queries over its steps.

use std::collections::{BTreeMap, HashMap, HashSet};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{
    EffortEstimate, PlanRisk, PlanStatus, PlanStrategy, ProblemAnalysis, Step, StepStatus,
};
use crate::validation::{self, PlanValidation};

/// Step id mapped to the ids of the steps it depends on.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

/// Represents a complete plan: the goal, its analysis and the step graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan, assigned by the store
    pub id: u64,

    /// Goal the plan works towards
    pub goal: String,

    /// Scope and complexity classification of the goal
    #[serde(default)]
    pub analysis: ProblemAnalysis,

    /// How the steps are meant to be carried out
    #[serde(default)]
    pub strategy: PlanStrategy,

    /// Steps in their order-hint order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Dependency edges between steps
    #[serde(default)]
    pub dependencies: DependencyMap,

    /// Estimated effort for all steps
    #[serde(default)]
    pub estimate: EffortEstimate,

    /// Known risks
    #[serde(default)]
    pub risks: Vec<PlanRisk>,

    /// Lifecycle status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Plan {
    /// Returns the step with the given id.
    pub fn get_step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Steps that `step_id` depends on. Unknown ids in the map are skipped.
    pub fn get_dependencies(&self, step_id: &str) -> Vec<&Step> {
        self.dependencies
            .get(step_id)
            .map(|deps| deps.iter().filter_map(|dep| self.get_step(dep)).collect())
            .unwrap_or_default()
    }

    /// Steps whose dependency list contains `step_id`.
    pub fn get_dependents(&self, step_id: &str) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|step| {
                self.dependencies
                    .get(&step.id)
                    .is_some_and(|deps| deps.iter().any(|dep| dep == step_id))
            })
            .collect()
    }

    /// Pending steps whose dependencies are all completed or skipped.
    pub fn get_ready_steps(&self) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Pending && self.dependencies_resolved(&step.id))
            .collect()
    }

    fn dependencies_resolved(&self, step_id: &str) -> bool {
        self.dependencies.get(step_id).is_none_or(|deps| {
            deps.iter()
                .all(|dep| self.get_step(dep).is_some_and(|s| s.status.is_resolved()))
        })
    }

    /// Status as it should be shown: pending steps that cannot start yet are
    /// reported as blocked.
    pub fn effective_status(&self, step_id: &str) -> Option<StepStatus> {
        let step = self.get_step(step_id)?;
        if step.status == StepStatus::Pending && !self.dependencies_resolved(step_id) {
            Some(StepStatus::Blocked)
        } else {
            Some(step.status)
        }
    }

    /// Groups steps into levels by dependency depth.
    ///
    /// A step without dependencies sits on level 0, every other step one level
    /// above its deepest dependency. Steps within a level never depend on each
    /// other and keep their step-list order.
    pub fn get_parallelizable_steps(&self) -> Vec<Vec<&Step>> {
        let mut memo = HashMap::new();
        let mut on_path = HashSet::new();
        for step in &self.steps {
            self.level_of(&step.id, &mut memo, &mut on_path);
        }

        let depth = memo.values().copied().max().map_or(0, |max| max + 1);
        let mut levels: Vec<Vec<&Step>> = vec![Vec::new(); depth];
        for step in &self.steps {
            levels[memo[step.id.as_str()]].push(step);
        }
        levels
    }

    fn level_of<'a>(
        &'a self,
        id: &'a str,
        memo: &mut HashMap<&'a str, usize>,
        on_path: &mut HashSet<&'a str>,
    ) -> usize {
        if let Some(&level) = memo.get(id) {
            return level;
        }
        // Back edge: only reachable on graphs that fail validation.
        if !on_path.insert(id) {
            return 0;
        }

        let level = self
            .dependencies
            .get(id)
            .into_iter()
            .flatten()
            .filter(|dep| self.get_step(dep).is_some())
            .map(|dep| 1 + self.level_of(dep, memo, on_path))
            .max()
            .unwrap_or(0);

        on_path.remove(id);
        memo.insert(id, level);
        level
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> usize {
        self.count_with(|status| status == StepStatus::Completed)
    }

    /// Number of completed or skipped steps.
    pub fn resolved_count(&self) -> usize {
        self.count_with(|status| status.is_resolved())
    }

    fn count_with(&self, predicate: impl Fn(StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|step| predicate(step.status)).count()
    }

    /// Fraction of resolved steps, in `[0, 1]`. Skipped steps count as
    /// resolved, matching the rule that completes the plan.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.resolved_count() as f64 / self.steps.len() as f64
        }
    }

    /// Whether every step is completed or skipped.
    pub fn all_resolved(&self) -> bool {
        self.steps.iter().all(|step| step.status.is_resolved())
    }

    /// Whether the plan has reached an outcome.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Structural validation of the dependency graph.
    pub fn validate(&self) -> PlanValidation {
        validation::validate_graph(&self.steps, &self.dependencies)
    }

    /// Returns a copy of this plan with a new status.
    pub fn with_status(&self, status: PlanStatus) -> Self {
        Self {
            status,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }

    /// Returns a copy of this plan with the step of the same id replaced.
    pub fn with_step(&self, step: Step) -> Self {
        let steps = self
            .steps
            .iter()
            .map(|existing| {
                if existing.id == step.id {
                    step.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Self {
            steps,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }

    /// Returns a copy of this plan with the step appended. No dependencies
    /// are added.
    pub fn with_step_appended(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        self.with_steps(steps, self.dependencies.clone())
    }

    /// Returns a copy of this plan without the step, and without every
    /// dependency edge that pointed at it.
    pub fn without_step(&self, step_id: &str) -> Self {
        let steps = self
            .steps
            .iter()
            .filter(|step| step.id != step_id)
            .cloned()
            .collect();
        let dependencies = self
            .dependencies
            .iter()
            .filter(|(id, _)| id.as_str() != step_id)
            .map(|(id, deps)| {
                let kept = deps.iter().filter(|dep| *dep != step_id).cloned().collect();
                (id.clone(), kept)
            })
            .collect();
        self.with_steps(steps, dependencies)
    }

    fn with_steps(&self, steps: Vec<Step>, dependencies: DependencyMap) -> Self {
        Self {
            estimate: EffortEstimate::from_steps(&steps, &self.analysis),
            steps,
            dependencies,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }
}
