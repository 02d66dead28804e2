use std::sync::{Arc, Mutex};

use waypoint_core::{NewStep, PlanEvent, Planner, PlannerBuilder, params::CreateDetailedPlan};

/// Helper function to create a planner that records emitted event types
pub fn create_test_planner() -> (Planner, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let planner = PlannerBuilder::new()
        .with_listener(move |event: &PlanEvent| {
            sink.lock()
                .expect("listener lock")
                .push(event.event_type().to_string());
        })
        .build();
    (planner, seen)
}

/// Build a detailed plan request from `(id, depends_on)` pairs.
pub fn graph_request(goal: &str, graph: &[(&str, &[&str])]) -> CreateDetailedPlan {
    CreateDetailedPlan {
        goal: goal.to_string(),
        steps: graph
            .iter()
            .map(|(id, _)| NewStep::new(*id, format!("Step {id}")))
            .collect(),
        dependencies: graph
            .iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(id, deps)| (id.to_string(), deps.iter().map(|d| d.to_string()).collect()))
            .collect(),
        ..Default::default()
    }
}
