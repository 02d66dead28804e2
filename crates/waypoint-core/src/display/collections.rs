//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{PlanSummary, Step};

/// Newtype wrapper for displaying collections of plan summaries.
///
/// Handles empty collections gracefully and leaves any title to the caller.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{
///     display::PlanSummaries,
///     models::{PlanStatus, PlanSummary},
/// };
/// use jiff::Timestamp;
///
/// let plan = PlanSummary {
///     id: 1,
///     goal: "Add a config loader".to_string(),
///     status: PlanStatus::InProgress,
///     created_at: Timestamp::now(),
///     total_steps: 5,
///     completed_steps: 2,
///     skipped_steps: 0,
///     pending_steps: 3,
/// };
///
/// let summaries = PlanSummaries(vec![plan]);
/// let output = format!("{}", summaries);
/// assert!(output.contains("Add a config loader"));
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plan summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the plan summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{plan}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a list of steps, such as the ready set.
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{step}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying dependency levels.
///
/// Level *n* holds the steps whose deepest dependency chain has length *n*;
/// every step in a level can run alongside the others once the previous
/// levels are resolved.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{display::Levels, models::Step};
///
/// let levels = Levels(vec![
///     vec![Step::new("A", 0, "Design")],
///     vec![Step::new("B", 1, "Build"), Step::new("C", 2, "Docs")],
/// ]);
///
/// let output = levels.to_string();
/// assert!(output.contains("- Level 2: `B` Build, `C` Docs"));
/// ```
pub struct Levels(pub Vec<Vec<Step>>);

impl Levels {
    /// Number of levels, the length of the critical path in steps.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Size of the widest level.
    pub fn max_width(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl fmt::Display for Levels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps found.");
        }
        for (index, level) in self.0.iter().enumerate() {
            let steps: Vec<String> = level
                .iter()
                .map(|step| format!("`{}` {}", step.id, step.title))
                .collect();
            writeln!(f, "- Level {}: {}", index + 1, steps.join(", "))?;
        }
        Ok(())
    }
}
