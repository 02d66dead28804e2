//! Plan creation and plan-level transitions for the Planner.

use jiff::Timestamp;
use log::{debug, info, warn};

use super::{Change, Planner};
use crate::{
    analyzer,
    error::{EngineError, Result},
    events::PlanEvent,
    models::{DependencyMap, EffortEstimate, Plan, PlanRisk, PlanStatus},
    params::{CreateDetailedPlan, CreateSimplePlan, NewStep},
    validation,
};

/// Rejects risks whose probability is not a finite value in `[0, 1]`.
fn validate_risks(risks: &[PlanRisk]) -> Result<()> {
    match risks
        .iter()
        .find(|risk| !(0.0..=1.0).contains(&risk.probability))
    {
        Some(risk) => Err(EngineError::invalid_input("risks").with_reason(format!(
            "probability of '{}' must be between 0 and 1, got {}",
            risk.description, risk.probability
        ))),
        None => Ok(()),
    }
}

impl Planner {
    /// Creates a linear plan: step *i + 1* depends only on step *i*.
    ///
    /// Steps get the ids `"1"`, `"2"`, ... in title order. Analysis and
    /// strategy come from the heuristic analyzer.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the goal is blank.
    pub fn create_simple_plan(&self, params: &CreateSimplePlan) -> Result<Plan> {
        let steps: Vec<NewStep> = params
            .titles
            .iter()
            .enumerate()
            .map(|(i, title)| NewStep::new((i + 1).to_string(), title.clone()))
            .collect();
        let dependencies: DependencyMap = (2..=steps.len())
            .map(|n| (n.to_string(), vec![(n - 1).to_string()]))
            .collect();

        let analysis = analyzer::analyze_goal(&params.goal);
        let strategy = analyzer::suggest_strategy(&analysis);

        self.create_detailed_plan(CreateDetailedPlan {
            goal: params.goal.clone(),
            analysis,
            strategy,
            steps,
            dependencies,
            risks: Vec::new(),
        })
    }

    /// Creates a plan with an arbitrary dependency graph.
    ///
    /// The graph is validated first; an invalid plan is never stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the goal is blank or a risk
    /// probability falls outside `[0, 1]`, and `EngineError::InvalidPlan` if
    /// the graph has a cycle, a duplicate step id or a reference to an
    /// unknown step.
    pub fn create_detailed_plan(&self, params: CreateDetailedPlan) -> Result<Plan> {
        if params.goal.trim().is_empty() {
            return Err(EngineError::invalid_input("goal").with_reason("goal cannot be empty"));
        }

        let steps: Vec<_> = params
            .steps
            .into_iter()
            .enumerate()
            .map(|(order, step)| step.into_step(order as u32))
            .collect();

        let validation = validation::validate_graph(&steps, &params.dependencies);
        if !validation.is_valid {
            warn!(
                "rejected plan for goal '{}': {}",
                params.goal,
                validation.errors.join("; ")
            );
            return Err(EngineError::InvalidPlan {
                errors: validation.errors,
            });
        }
        validate_risks(&params.risks)?;

        let mut state = self.lock();
        let now = Timestamp::now();
        let plan = Plan {
            id: state.store.allocate_id(),
            estimate: EffortEstimate::from_steps(&steps, &params.analysis),
            goal: params.goal,
            analysis: params.analysis,
            strategy: params.strategy,
            steps,
            dependencies: params.dependencies,
            risks: params.risks,
            status: PlanStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        state.store.insert(plan.clone());
        info!("created plan {} with {} step(s)", plan.id, plan.steps.len());

        self.events.enqueue([PlanEvent::PlanCreated {
            plan_id: plan.id,
            goal: plan.goal.clone(),
            timestamp: now,
        }]);
        drop(state);
        self.events.flush();
        Ok(plan)
    }

    /// Creates a plan for a free-text goal through the configured proposer.
    ///
    /// The proposal is validated exactly like [`Planner::create_detailed_plan`]
    /// input before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` if no proposer is configured,
    /// `EngineError::Proposer` if the proposer fails, and the errors of
    /// [`Planner::create_detailed_plan`] for an unusable proposal.
    pub async fn create_plan(&self, goal: &str, context: &str) -> Result<Plan> {
        let proposer = self
            .proposer
            .clone()
            .ok_or_else(|| EngineError::Configuration {
                message: "no plan proposer configured".to_string(),
            })?;

        debug!("requesting proposal from '{}'", proposer.name());
        let proposal = proposer
            .propose(goal, context)
            .await
            .map_err(|source| EngineError::Proposer { source })?;

        self.create_detailed_plan(proposal.into_request(goal))
    }

    /// Moves a draft plan to approved.
    pub fn approve_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            if plan.status != PlanStatus::Draft {
                return Err(EngineError::plan_transition(plan.id, plan.status, "approve"));
            }
            info!("approved plan {plan_id}");
            Ok(Some(Change {
                plan: plan.with_status(PlanStatus::Approved),
                events: vec![PlanEvent::PlanApproved {
                    plan_id,
                    timestamp: Timestamp::now(),
                }],
            }))
        })
    }

    /// Starts an approved plan and makes it the active plan.
    ///
    /// A plan with nothing left to do completes right away.
    pub fn start_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            if plan.status != PlanStatus::Approved {
                return Err(EngineError::plan_transition(plan.id, plan.status, "start"));
            }
            info!("started plan {plan_id}");
            let mut change = Change {
                plan: plan.with_status(PlanStatus::InProgress),
                events: vec![PlanEvent::PlanStarted {
                    plan_id,
                    timestamp: Timestamp::now(),
                }],
            };
            change.finish_if_resolved();
            Ok(Some(change))
        })
    }

    /// Cancels a plan that has not reached an outcome yet.
    pub fn cancel_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            if plan.is_terminal() {
                return Err(EngineError::plan_transition(plan.id, plan.status, "cancel"));
            }
            info!("cancelled plan {plan_id}");
            Ok(Some(Change {
                plan: plan.with_status(PlanStatus::Cancelled),
                events: vec![PlanEvent::PlanCancelled {
                    plan_id,
                    timestamp: Timestamp::now(),
                }],
            }))
        })
    }

    /// Removes a plan from the store entirely, returning it.
    pub fn delete_plan(&self, plan_id: u64) -> Option<Plan> {
        let mut state = self.lock();
        let removed = state.store.remove(plan_id)?;
        if state.active_plan == Some(plan_id) {
            state.active_plan = None;
        }
        info!("deleted plan {plan_id}");
        Some(removed)
    }
}

impl Change {
    /// Completes a running plan once every step is completed or skipped.
    pub(crate) fn finish_if_resolved(&mut self) {
        if self.plan.status == PlanStatus::InProgress && self.plan.all_resolved() {
            info!("plan {} completed", self.plan.id);
            self.plan = self.plan.with_status(PlanStatus::Completed);
            self.events.push(PlanEvent::PlanCompleted {
                plan_id: self.plan.id,
                timestamp: Timestamp::now(),
            });
        }
    }
}
