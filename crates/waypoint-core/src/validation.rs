//! Structural validation of a plan's dependency graph.
//!
//! Validation checks the graph only, never execution state:
//! - step ids are unique,
//! - every id mentioned in the dependency map belongs to a step,
//! - the dependency map is acyclic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{DependencyMap, Step};

/// Outcome of validating a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl PlanValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate steps and their dependency edges.
pub fn validate_graph(steps: &[Step], dependencies: &DependencyMap) -> PlanValidation {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for step in steps {
        if !ids.insert(step.id.as_str()) {
            errors.push(format!("duplicate step id '{}'", step.id));
        }
    }

    for (step_id, deps) in dependencies {
        if !ids.contains(step_id.as_str()) {
            errors.push(format!("dependency entry for unknown step '{step_id}'"));
        }
        for dep in deps {
            if !ids.contains(dep.as_str()) {
                errors.push(format!("step '{step_id}' depends on unknown step '{dep}'"));
            }
        }
    }

    errors.extend(detect_cycles(dependencies));
    PlanValidation::from_errors(errors)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Depth-first search with an active-path marker. Each cycle is reported
/// once, as the path that closes it.
fn detect_cycles(dependencies: &DependencyMap) -> Vec<String> {
    let mut marks = HashMap::new();
    let mut path = Vec::new();
    let mut errors = Vec::new();

    for node in dependencies.keys() {
        visit(node, dependencies, &mut marks, &mut path, &mut errors);
    }
    errors
}

fn visit<'a>(
    node: &'a str,
    dependencies: &'a DependencyMap,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    errors: &mut Vec<String>,
) {
    match marks.get(node) {
        Some(Mark::Done) => return,
        Some(Mark::OnPath) => {
            let start = path.iter().position(|n| *n == node).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(node);
            errors.push(format!(
                "circular dependency detected: {}",
                cycle.join(" -> ")
            ));
            return;
        }
        None => {}
    }

    marks.insert(node, Mark::OnPath);
    path.push(node);
    for dep in dependencies.get(node).into_iter().flatten() {
        visit(dep, dependencies, marks, path, errors);
    }
    path.pop();
    marks.insert(node, Mark::Done);
}
