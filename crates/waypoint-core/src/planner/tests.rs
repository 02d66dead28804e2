//! Tests for the planner module.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;
use crate::{
    error::EngineError,
    models::{Impact, PlanFilter, PlanRisk, PlanStatus, StepStatus, StepType},
    params::{CreateDetailedPlan, CreateSimplePlan, NewStep},
    proposer::ProposedPlan,
};

/// Helper function to create a planner that records every event it emits
fn create_recording_planner() -> (Planner, Arc<Mutex<Vec<PlanEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let planner = PlannerBuilder::new()
        .with_listener(move |event| sink.lock().unwrap().push(event.clone()))
        .build();
    (planner, events)
}

fn event_types(events: &Arc<Mutex<Vec<PlanEvent>>>) -> Vec<&'static str> {
    events.lock().unwrap().iter().map(PlanEvent::event_type).collect()
}

fn simple_plan(planner: &Planner, titles: &[&str]) -> Plan {
    planner
        .create_simple_plan(&CreateSimplePlan {
            goal: "Add a config loader".to_string(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        })
        .expect("Failed to create plan")
}

/// A diamond: A -> {B, C} -> D
fn diamond_request() -> CreateDetailedPlan {
    CreateDetailedPlan {
        goal: "Build the reporting module".to_string(),
        steps: ["A", "B", "C", "D"]
            .into_iter()
            .map(|id| NewStep::new(id, format!("Step {id}")))
            .collect(),
        dependencies: [
            ("B".to_string(), vec!["A".to_string()]),
            ("C".to_string(), vec!["A".to_string()]),
            ("D".to_string(), vec!["B".to_string(), "C".to_string()]),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

fn running_plan(planner: &Planner, titles: &[&str]) -> Plan {
    let plan = simple_plan(planner, titles);
    planner.approve_plan(plan.id).expect("approve").expect("plan exists");
    planner.start_plan(plan.id).expect("start").expect("plan exists")
}

#[test]
fn test_create_simple_plan_builds_linear_chain() {
    let (planner, events) = create_recording_planner();

    let plan = simple_plan(&planner, &["Design", "Implement", "Test"]);

    assert_eq!(plan.id, 1);
    assert_eq!(plan.status, PlanStatus::Draft);
    let ids: Vec<_> = plan.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert!(plan.dependencies.get("1").is_none());
    assert_eq!(plan.dependencies["2"], ["1"]);
    assert_eq!(plan.dependencies["3"], ["2"]);
    assert_eq!(plan.estimate.total_steps, 3);
    assert_eq!(event_types(&events), ["plan_created"]);
}

#[test]
fn test_create_simple_plan_rejects_blank_goal() {
    let planner = PlannerBuilder::new().build();

    let result = planner.create_simple_plan(&CreateSimplePlan {
        goal: "   ".to_string(),
        titles: vec!["Only".to_string()],
    });

    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    assert!(planner.list_plans(&PlanFilter::default()).is_empty());
}

#[test]
fn test_create_detailed_plan_rejects_cycle_without_storing() {
    let (planner, events) = create_recording_planner();
    let mut request = diamond_request();
    request
        .dependencies
        .insert("A".to_string(), vec!["D".to_string()]);

    let err = planner
        .create_detailed_plan(request)
        .expect_err("cyclic plan must be rejected");

    match err {
        EngineError::InvalidPlan { errors } => {
            assert!(errors.iter().any(|e| e.contains("circular dependency")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(planner.list_plans(&PlanFilter::default()).is_empty());
    assert!(events.lock().unwrap().is_empty());

    // A rejected plan does not consume an id
    let plan = planner
        .create_detailed_plan(diamond_request())
        .expect("Failed to create plan");
    assert_eq!(plan.id, 1);
}

#[test]
fn test_create_detailed_plan_rejects_unknown_reference() {
    let planner = PlannerBuilder::new().build();
    let mut request = diamond_request();
    request
        .dependencies
        .insert("B".to_string(), vec!["Z".to_string()]);

    let result = planner.create_detailed_plan(request);

    assert!(matches!(result, Err(EngineError::InvalidPlan { .. })));
}

#[test]
fn test_create_detailed_plan_saturates_token_total() {
    let planner = PlannerBuilder::new().build();
    let mut huge = NewStep::new("a", "Huge");
    huge.estimated_tokens = u64::MAX;
    let mut small = NewStep::new("b", "Small");
    small.estimated_tokens = 1;

    let plan = planner
        .create_detailed_plan(CreateDetailedPlan {
            goal: "Index the monorepo".to_string(),
            steps: vec![huge, small],
            ..Default::default()
        })
        .expect("Failed to create plan");

    assert_eq!(plan.estimate.total_tokens, u64::MAX);
    assert_eq!(plan.id, 1);
}

#[test]
fn test_create_detailed_plan_rejects_out_of_range_risk() {
    let (planner, events) = create_recording_planner();

    for probability in [7.0, -0.5, f64::NAN, f64::INFINITY] {
        let mut request = diamond_request();
        request.risks = vec![PlanRisk {
            description: "schema drift".to_string(),
            probability,
            impact: Impact::High,
            mitigation: String::new(),
        }];

        let result = planner.create_detailed_plan(request);

        assert!(
            matches!(result, Err(EngineError::InvalidInput { ref field, .. }) if field == "risks"),
            "probability {probability} accepted"
        );
    }
    assert!(planner.list_plans(&PlanFilter::default()).is_empty());
    assert!(events.lock().unwrap().is_empty());

    let mut request = diamond_request();
    request.risks = vec![PlanRisk {
        description: "schema drift".to_string(),
        probability: 1.0,
        impact: Impact::Critical,
        mitigation: String::new(),
    }];
    let plan = planner.create_detailed_plan(request).unwrap();
    assert_eq!(plan.id, 1);
}

#[test]
fn test_plan_lifecycle_transitions() {
    let planner = PlannerBuilder::new().build();
    let plan = simple_plan(&planner, &["Only"]);

    let approved = planner.approve_plan(plan.id).unwrap().unwrap();
    assert_eq!(approved.status, PlanStatus::Approved);
    assert!(planner.active_plan().is_none());

    let started = planner.start_plan(plan.id).unwrap().unwrap();
    assert_eq!(started.status, PlanStatus::InProgress);
    assert_eq!(planner.active_plan().map(|p| p.id), Some(plan.id));

    let cancelled = planner.cancel_plan(plan.id).unwrap().unwrap();
    assert_eq!(cancelled.status, PlanStatus::Cancelled);
    assert!(planner.active_plan().is_none());
}

#[test]
fn test_invalid_transition_leaves_plan_unchanged() {
    let (planner, events) = create_recording_planner();
    let plan = simple_plan(&planner, &["Only"]);

    // Starting a draft is not allowed
    let err = planner.start_plan(plan.id).expect_err("draft cannot start");
    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            entity: "plan",
            action: "start",
            ..
        }
    ));
    assert_eq!(planner.get_plan(plan.id), Some(plan.clone()));

    // Steps cannot run before the plan does
    assert!(planner.start_next_step(plan.id).is_err());
    assert_eq!(event_types(&events), ["plan_created"]);
}

#[test]
fn test_terminal_plans_reject_everything() {
    let planner = PlannerBuilder::new().build();
    let plan = simple_plan(&planner, &["Only"]);
    planner.cancel_plan(plan.id).unwrap();

    assert!(planner.approve_plan(plan.id).is_err());
    assert!(planner.cancel_plan(plan.id).is_err());
    assert!(planner.add_step(plan.id, NewStep::new("2", "Late")).is_err());
    assert!(planner.remove_step(plan.id, "1").is_err());
}

#[test]
fn test_unknown_ids_are_not_errors() {
    let planner = PlannerBuilder::new().build();
    let plan = running_plan(&planner, &["Only"]);
    let before = planner.list_plans(&PlanFilter::default());

    assert!(planner.get_plan(999).is_none());
    assert!(planner.approve_plan(999).unwrap().is_none());
    assert!(planner.start_plan(999).unwrap().is_none());
    assert!(planner.cancel_plan(999).unwrap().is_none());
    assert!(planner.start_next_step(999).unwrap().is_none());
    assert!(planner.complete_step(999, "1", None).unwrap().is_none());
    assert!(planner.complete_step(plan.id, "nope", None).unwrap().is_none());
    assert!(planner.fail_step(plan.id, "nope", "boom").unwrap().is_none());
    assert!(planner.skip_step(plan.id, "nope").unwrap().is_none());
    assert!(planner.remove_step(plan.id, "nope").unwrap().is_none());
    assert!(planner.add_step(999, NewStep::new("x", "X")).unwrap().is_none());
    assert!(planner.skip_step(999, "1").unwrap().is_none());
    assert!(planner.fail_step(999, "1", "boom").unwrap().is_none());
    assert!(planner.get_ready_steps(999).is_none());
    assert!(planner.validate_plan(999).is_none());
    assert!(!planner.is_executable(999));
    assert!(planner.delete_plan(999).is_none());

    assert_eq!(planner.list_plans(&PlanFilter::default()), before);
    assert_eq!(planner.active_plan().map(|p| p.id), Some(plan.id));
}

#[test]
fn test_full_execution_completes_plan() {
    let (planner, events) = create_recording_planner();
    let plan = running_plan(&planner, &["Design", "Implement"]);

    let first = planner.start_next_step(plan.id).unwrap().unwrap();
    assert_eq!(first.id, "1");
    assert_eq!(first.status, StepStatus::InProgress);

    // The second step waits on the first
    assert!(planner.start_next_step(plan.id).unwrap().is_none());

    let updated = planner
        .complete_step(plan.id, "1", Some("schema.json".to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(updated.get_step("1").unwrap().result.as_deref(), Some("schema.json"));
    assert_eq!(updated.status, PlanStatus::InProgress);

    let second = planner.start_next_step(plan.id).unwrap().unwrap();
    assert_eq!(second.id, "2");
    let finished = planner.complete_step(plan.id, "2", None).unwrap().unwrap();

    assert_eq!(finished.status, PlanStatus::Completed);
    assert_eq!(finished.progress(), 1.0);
    assert!(planner.active_plan().is_none());
    assert_eq!(
        event_types(&events),
        [
            "plan_created",
            "plan_approved",
            "plan_started",
            "step_started",
            "step_completed",
            "step_started",
            "step_completed",
            "plan_completed",
        ]
    );
}

#[test]
fn test_fail_step_fails_plan() {
    let (planner, events) = create_recording_planner();
    let plan = running_plan(&planner, &["Design", "Implement"]);
    planner.start_next_step(plan.id).unwrap();

    let failed = planner
        .fail_step(plan.id, "1", "schema rejected")
        .unwrap()
        .unwrap();

    assert_eq!(failed.status, PlanStatus::Failed);
    let step = failed.get_step("1").unwrap();
    assert_eq!(step.status, StepStatus::Failed);
    assert_eq!(step.error.as_deref(), Some("schema rejected"));
    assert!(planner.active_plan().is_none());

    let recorded = events.lock().unwrap();
    let tail: Vec<_> = recorded.iter().rev().take(2).collect();
    assert!(matches!(tail[0], PlanEvent::PlanFailed { step_id, .. } if step_id == "1"));
    assert!(matches!(tail[1], PlanEvent::StepFailed { error, .. } if error == "schema rejected"));
}

#[test]
fn test_complete_requires_running_step() {
    let planner = PlannerBuilder::new().build();
    let plan = running_plan(&planner, &["Design"]);

    let err = planner
        .complete_step(plan.id, "1", None)
        .expect_err("pending step cannot complete");

    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            entity: "step",
            action: "complete",
            ..
        }
    ));
    assert_eq!(
        planner.get_plan(plan.id).unwrap().get_step("1").unwrap().status,
        StepStatus::Pending
    );
}

#[test]
fn test_skip_unblocks_dependents_and_can_complete_plan() {
    let planner = PlannerBuilder::new().build();
    let plan = running_plan(&planner, &["Design", "Implement"]);

    planner.skip_step(plan.id, "1").unwrap();
    let ready = planner.get_ready_steps(plan.id).unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].id, "2");

    let done = planner.skip_step(plan.id, "2").unwrap().unwrap();
    assert_eq!(done.status, PlanStatus::Completed);
}

#[test]
fn test_start_step_fans_out_a_level() {
    let planner = PlannerBuilder::new().build();
    let plan = planner.create_detailed_plan(diamond_request()).unwrap();
    planner.approve_plan(plan.id).unwrap();
    planner.start_plan(plan.id).unwrap();

    // D is blocked until B and C resolve
    assert!(planner.start_step(plan.id, "D").is_err());

    planner.start_step(plan.id, "A").unwrap().unwrap();
    planner.complete_step(plan.id, "A", None).unwrap();

    let b = planner.start_step(plan.id, "B").unwrap().unwrap();
    let c = planner.start_step(plan.id, "C").unwrap().unwrap();
    assert_eq!(b.status, StepStatus::InProgress);
    assert_eq!(c.status, StepStatus::InProgress);

    // Already running
    assert!(planner.start_step(plan.id, "B").is_err());
    assert!(planner.start_step(plan.id, "missing").unwrap().is_none());
}

#[test]
fn test_parallelizable_levels_of_diamond() {
    let planner = PlannerBuilder::new().build();
    let plan = planner.create_detailed_plan(diamond_request()).unwrap();

    let levels = planner.get_parallelizable_steps(plan.id).unwrap();
    let ids: Vec<Vec<&str>> = levels
        .iter()
        .map(|level| level.iter().map(|s| s.id.as_str()).collect())
        .collect();

    assert_eq!(ids, vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
}

#[test]
fn test_start_plan_with_no_steps_completes_immediately() {
    let (planner, events) = create_recording_planner();
    let plan = simple_plan(&planner, &[]);
    planner.approve_plan(plan.id).unwrap();

    let started = planner.start_plan(plan.id).unwrap().unwrap();

    assert_eq!(started.status, PlanStatus::Completed);
    assert!(planner.active_plan().is_none());
    assert_eq!(
        event_types(&events),
        ["plan_created", "plan_approved", "plan_started", "plan_completed"]
    );
}

#[test]
fn test_starting_resolved_plan_replaces_active_plan() {
    let planner = PlannerBuilder::new().build();
    let running = running_plan(&planner, &["Only"]);
    assert_eq!(planner.active_plan().map(|p| p.id), Some(running.id));

    let empty = simple_plan(&planner, &[]);
    planner.approve_plan(empty.id).unwrap();
    let started = planner.start_plan(empty.id).unwrap().unwrap();

    assert_eq!(started.status, PlanStatus::Completed);
    assert!(planner.active_plan().is_none());
    assert_eq!(
        planner.get_plan(running.id).unwrap().status,
        PlanStatus::InProgress
    );
}

#[test]
fn test_listener_can_call_back_into_planner() {
    let planner = Arc::new(PlannerBuilder::new().build());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let inner = Arc::clone(&planner);
    planner.add_listener(move |event| {
        let status = inner.get_plan(event.plan_id()).map(|plan| plan.status);
        sink.lock().unwrap().push((event.event_type(), status));
        // Start as soon as the plan is approved
        if let PlanEvent::PlanApproved { plan_id, .. } = event {
            inner.start_plan(*plan_id).unwrap();
        }
    });

    let plan = simple_plan(&planner, &["Only"]);
    planner.approve_plan(plan.id).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            ("plan_created", Some(PlanStatus::Draft)),
            ("plan_approved", Some(PlanStatus::Approved)),
            ("plan_started", Some(PlanStatus::InProgress)),
        ]
    );
    assert_eq!(planner.active_plan().map(|p| p.id), Some(plan.id));
}

#[test]
fn test_add_and_remove_steps() {
    let (planner, events) = create_recording_planner();
    let plan = simple_plan(&planner, &["Design", "Implement", "Test"]);

    let mut extra = NewStep::new("docs", "Write docs");
    extra.step_type = StepType::Document;
    let updated = planner.add_step(plan.id, extra).unwrap().unwrap();
    let added = updated.get_step("docs").unwrap();
    assert_eq!(added.order, 3);
    assert!(updated.dependencies.get("docs").is_none());
    assert_eq!(updated.estimate.total_steps, 4);

    // Duplicate ids are rejected
    let dup = planner.add_step(plan.id, NewStep::new("1", "Again"));
    assert!(matches!(dup, Err(EngineError::InvalidInput { .. })));

    let updated = planner.remove_step(plan.id, "2").unwrap().unwrap();
    assert!(updated.get_step("2").is_none());
    assert!(updated.dependencies.get("2").is_none());
    assert!(updated.dependencies["3"].is_empty());
    assert!(updated.validate().is_valid);

    let types = event_types(&events);
    assert_eq!(types[1..], ["step_added", "step_removed"]);
}

#[test]
fn test_remove_last_open_step_completes_running_plan() {
    let planner = PlannerBuilder::new().build();
    let plan = running_plan(&planner, &["Design", "Implement"]);
    planner.start_next_step(plan.id).unwrap();
    planner.complete_step(plan.id, "1", None).unwrap();

    let updated = planner.remove_step(plan.id, "2").unwrap().unwrap();

    assert_eq!(updated.status, PlanStatus::Completed);
}

#[test]
fn test_stats_and_summaries() {
    let planner = PlannerBuilder::new().build();
    let done = running_plan(&planner, &["Only"]);
    planner.start_next_step(done.id).unwrap();
    planner.complete_step(done.id, "1", None).unwrap();

    let failed = running_plan(&planner, &["Only"]);
    planner.fail_step(failed.id, "1", "boom").unwrap();

    simple_plan(&planner, &["Draft"]);

    let stats = planner.get_stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.draft, 1);
    assert_eq!(stats.success_rate, 0.5);
    assert_eq!(planner.count_in_status(PlanStatus::Draft), 1);

    let summaries = planner.list_plans_summary(&PlanFilter::with_status(PlanStatus::Completed));
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].completed_steps, 1);
}

#[test]
fn test_stats_empty_store() {
    let planner = PlannerBuilder::new().build();

    let stats = planner.get_stats();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.success_rate, 0.0);
}

#[test]
fn test_is_executable_and_delete() {
    let planner = PlannerBuilder::new().build();
    let plan = running_plan(&planner, &["Only"]);

    assert!(planner.is_executable(plan.id));
    assert_eq!(planner.progress(plan.id), Some(0.0));

    let removed = planner.delete_plan(plan.id).expect("plan exists");
    assert_eq!(removed.id, plan.id);
    assert!(planner.active_plan().is_none());
    assert!(!planner.is_executable(plan.id));
}

#[test]
fn test_removed_listener_receives_nothing() {
    let planner = PlannerBuilder::new().build();
    let seen = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&seen);
    let id = planner.add_listener(move |_| *counter.lock().unwrap() += 1);

    simple_plan(&planner, &["One"]);
    assert!(planner.remove_listener(id));
    simple_plan(&planner, &["Two"]);

    assert_eq!(*seen.lock().unwrap(), 1);
    assert!(!planner.remove_listener(id));
}

struct StaticProposer(ProposedPlan);

#[async_trait]
impl PlanProposer for StaticProposer {
    fn name(&self) -> &str {
        "static"
    }

    async fn propose(&self, _goal: &str, _context: &str) -> anyhow::Result<ProposedPlan> {
        Ok(self.0.clone())
    }
}

struct BrokenProposer;

#[async_trait]
impl PlanProposer for BrokenProposer {
    fn name(&self) -> &str {
        "broken"
    }

    async fn propose(&self, _goal: &str, _context: &str) -> anyhow::Result<ProposedPlan> {
        anyhow::bail!("model unavailable")
    }
}

#[tokio::test]
async fn test_create_plan_through_proposer() {
    let request = diamond_request();
    let proposal = ProposedPlan {
        steps: request.steps,
        dependencies: request.dependencies,
        ..Default::default()
    };
    let planner = PlannerBuilder::new()
        .with_proposer(StaticProposer(proposal))
        .build();

    let plan = planner
        .create_plan("Migrate the database layer", "")
        .await
        .expect("Failed to create plan");

    assert_eq!(plan.steps.len(), 4);
    assert_eq!(plan.goal, "Migrate the database layer");
    assert_eq!(plan.status, PlanStatus::Draft);
}

#[tokio::test]
async fn test_create_plan_validates_proposal() {
    let proposal = ProposedPlan {
        steps: vec![NewStep::new("A", "Loop")],
        dependencies: [("A".to_string(), vec!["A".to_string()])]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let planner = PlannerBuilder::new()
        .with_proposer(StaticProposer(proposal))
        .build();

    let result = planner.create_plan("Anything", "").await;

    assert!(matches!(result, Err(EngineError::InvalidPlan { .. })));
    assert!(planner.list_plans(&PlanFilter::default()).is_empty());
}

#[tokio::test]
async fn test_create_plan_errors() {
    let planner = PlannerBuilder::new().build();
    let result = planner.create_plan("Anything", "").await;
    assert!(matches!(result, Err(EngineError::Configuration { .. })));

    let planner = PlannerBuilder::new().with_proposer(BrokenProposer).build();
    let result = planner.create_plan("Anything", "").await;
    assert!(matches!(result, Err(EngineError::Proposer { .. })));
}

#[test]
fn test_planner_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Planner>();
}
