//! Step execution and graph modification for the Planner.
//!
//! Every operation resolves the plan and the step before it checks any
//! state, so an unknown id is always reported as `Ok(None)`.

use jiff::Timestamp;
use log::{debug, info};

use super::{Change, Planner};
use crate::{
    error::{EngineError, Result},
    events::PlanEvent,
    models::{Plan, PlanStatus, Step, StepStatus},
    params::NewStep,
};

/// Steps may only execute while their plan runs.
fn ensure_running(plan: &Plan, action: &'static str) -> Result<()> {
    if plan.status == PlanStatus::InProgress {
        Ok(())
    } else {
        Err(EngineError::plan_transition(plan.id, plan.status, action))
    }
}

/// The graph may only change until the plan reaches an outcome.
fn ensure_modifiable(plan: &Plan, action: &'static str) -> Result<()> {
    if plan.is_terminal() {
        Err(EngineError::plan_transition(plan.id, plan.status, action))
    } else {
        Ok(())
    }
}

fn begin(plan: &Plan, step: &Step) -> Change {
    debug!("plan {}: starting step '{}'", plan.id, step.id);
    Change {
        plan: plan.with_step(step.with_status(StepStatus::InProgress)),
        events: vec![PlanEvent::StepStarted {
            plan_id: plan.id,
            step_id: step.id.clone(),
            timestamp: Timestamp::now(),
        }],
    }
}

impl Planner {
    /// Starts the first ready step, in step order.
    ///
    /// Returns `Ok(None)` when the plan is unknown or no step is ready.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` if the plan is not running.
    pub fn start_next_step(&self, plan_id: u64) -> Result<Option<Step>> {
        let mut started = None;
        self.update_plan(plan_id, |plan| {
            ensure_running(plan, "start a step of")?;
            let Some(step) = plan.get_ready_steps().into_iter().next() else {
                debug!("plan {plan_id}: no step is ready");
                return Ok(None);
            };
            let change = begin(plan, step);
            started = change.plan.get_step(&step.id).cloned();
            Ok(Some(change))
        })?;
        Ok(started)
    }

    /// Starts a specific step, which must be ready.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` if the plan is not running,
    /// the step is not pending, or one of its dependencies is unresolved.
    pub fn start_step(&self, plan_id: u64, step_id: &str) -> Result<Option<Step>> {
        let mut started = None;
        self.update_plan(plan_id, |plan| {
            let Some(step) = plan.get_step(step_id) else {
                return Ok(None);
            };
            ensure_running(plan, "start a step of")?;
            if step.status != StepStatus::Pending {
                return Err(EngineError::step_transition(step_id, step.status, "start"));
            }
            if !plan.get_ready_steps().iter().any(|ready| ready.id == step_id) {
                return Err(EngineError::step_transition(
                    step_id,
                    StepStatus::Blocked,
                    "start",
                ));
            }
            let change = begin(plan, step);
            started = change.plan.get_step(step_id).cloned();
            Ok(Some(change))
        })?;
        Ok(started)
    }

    /// Completes a running step, recording its output.
    ///
    /// Completes the plan when no unresolved step remains.
    pub fn complete_step(
        &self,
        plan_id: u64,
        step_id: &str,
        output: Option<String>,
    ) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            let Some(step) = plan.get_step(step_id) else {
                return Ok(None);
            };
            ensure_running(plan, "complete a step of")?;
            if step.status != StepStatus::InProgress {
                return Err(EngineError::step_transition(step_id, step.status, "complete"));
            }

            debug!("plan {plan_id}: completed step '{step_id}'");
            let mut change = Change {
                plan: plan.with_step(step.completed(output.clone())),
                events: vec![PlanEvent::StepCompleted {
                    plan_id,
                    step_id: step_id.to_string(),
                    output,
                    timestamp: Timestamp::now(),
                }],
            };
            change.finish_if_resolved();
            Ok(Some(change))
        })
    }

    /// Fails a step and, with it, the whole plan.
    pub fn fail_step(
        &self,
        plan_id: u64,
        step_id: &str,
        error: impl Into<String>,
    ) -> Result<Option<Plan>> {
        let error = error.into();
        self.update_plan(plan_id, |plan| {
            let Some(step) = plan.get_step(step_id) else {
                return Ok(None);
            };
            ensure_running(plan, "fail a step of")?;
            if !matches!(
                step.status,
                StepStatus::Pending | StepStatus::InProgress | StepStatus::Blocked
            ) {
                return Err(EngineError::step_transition(step_id, step.status, "fail"));
            }

            info!("plan {plan_id} failed at step '{step_id}': {error}");
            let now = Timestamp::now();
            Ok(Some(Change {
                plan: plan
                    .with_step(step.failed(error.clone()))
                    .with_status(PlanStatus::Failed),
                events: vec![
                    PlanEvent::StepFailed {
                        plan_id,
                        step_id: step_id.to_string(),
                        error: error.clone(),
                        timestamp: now,
                    },
                    PlanEvent::PlanFailed {
                        plan_id,
                        step_id: step_id.to_string(),
                        error,
                        timestamp: now,
                    },
                ],
            }))
        })
    }

    /// Skips a step. Skipped steps satisfy their dependents.
    pub fn skip_step(&self, plan_id: u64, step_id: &str) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            let Some(step) = plan.get_step(step_id) else {
                return Ok(None);
            };
            ensure_running(plan, "skip a step of")?;
            if !matches!(step.status, StepStatus::Pending | StepStatus::InProgress) {
                return Err(EngineError::step_transition(step_id, step.status, "skip"));
            }

            debug!("plan {plan_id}: skipped step '{step_id}'");
            let mut change = Change {
                plan: plan.with_step(step.with_status(StepStatus::Skipped)),
                events: vec![PlanEvent::StepSkipped {
                    plan_id,
                    step_id: step_id.to_string(),
                    timestamp: Timestamp::now(),
                }],
            };
            change.finish_if_resolved();
            Ok(Some(change))
        })
    }

    /// Appends a step to the plan. No dependencies are added for it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for a blank or duplicate step id
    /// and `EngineError::InvalidTransition` if the plan is terminal.
    pub fn add_step(&self, plan_id: u64, step: NewStep) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            ensure_modifiable(plan, "add a step to")?;
            if step.id.trim().is_empty() {
                return Err(EngineError::invalid_input("id").with_reason("step id cannot be empty"));
            }
            if plan.get_step(&step.id).is_some() {
                return Err(EngineError::invalid_input("id")
                    .with_reason(format!("step '{}' already exists", step.id)));
            }

            debug!("plan {plan_id}: adding step '{}'", step.id);
            let step_id = step.id.clone();
            let order = plan.steps.len() as u32;
            Ok(Some(Change {
                plan: plan.with_step_appended(step.into_step(order)),
                events: vec![PlanEvent::StepAdded {
                    plan_id,
                    step_id,
                    timestamp: Timestamp::now(),
                }],
            }))
        })
    }

    /// Removes a step along with every dependency edge that mentions it.
    ///
    /// Removing the last unresolved step of a running plan completes it.
    pub fn remove_step(&self, plan_id: u64, step_id: &str) -> Result<Option<Plan>> {
        self.update_plan(plan_id, |plan| {
            if plan.get_step(step_id).is_none() {
                return Ok(None);
            }
            ensure_modifiable(plan, "remove a step from")?;

            debug!("plan {plan_id}: removing step '{step_id}'");
            let mut change = Change {
                plan: plan.without_step(step_id),
                events: vec![PlanEvent::StepRemoved {
                    plan_id,
                    step_id: step_id.to_string(),
                    timestamp: Timestamp::now(),
                }],
            };
            change.finish_if_resolved();
            Ok(Some(change))
        })
    }
}
