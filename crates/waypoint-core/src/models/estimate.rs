//! Effort estimation for a plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ProblemAnalysis, Step, StepType};

/// Rough cost of carrying out a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EffortEstimate {
    pub total_steps: usize,
    pub total_tokens: u64,
    pub estimated_minutes: u32,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    pub by_type: BTreeMap<StepType, usize>,
}

impl EffortEstimate {
    /// Derives an estimate from the steps of a plan and its analysis.
    ///
    /// Duration is the sum of each step type's baseline. Confidence starts at
    /// 1.0 for the easiest goals, drops 0.075 per difficulty point and a
    /// further 0.1 when the goal needs investigation, and never falls below
    /// 0.1.
    pub fn from_steps(steps: &[Step], analysis: &ProblemAnalysis) -> Self {
        let mut by_type = BTreeMap::new();
        for step in steps {
            *by_type.entry(step.step_type).or_insert(0) += 1;
        }

        let difficulty_penalty = f64::from(analysis.difficulty().saturating_sub(2)) * 0.075;
        let investigation_penalty = if analysis.needs_investigation() {
            0.1
        } else {
            0.0
        };

        Self {
            total_steps: steps.len(),
            total_tokens: steps
                .iter()
                .map(|s| s.estimated_tokens)
                .fold(0, u64::saturating_add),
            estimated_minutes: steps
                .iter()
                .map(|s| s.step_type.base_minutes())
                .fold(0, u32::saturating_add),
            confidence: (1.0 - difficulty_penalty - investigation_penalty).clamp(0.1, 1.0),
            by_type,
        }
    }

    /// Human-readable duration.
    ///
    /// ```rust
    /// use waypoint_core::models::EffortEstimate;
    ///
    /// let estimate = EffortEstimate { estimated_minutes: 180, ..Default::default() };
    /// assert_eq!(estimate.formatted_duration(), "about 3 hours");
    /// ```
    pub fn formatted_duration(&self) -> String {
        match self.estimated_minutes {
            1 => "1 minute".to_string(),
            m if m < 60 => format!("{m} minutes"),
            m => match m / 60 + u32::from(m % 60 >= 30) {
                1 => "about 1 hour".to_string(),
                hours => format!("about {hours} hours"),
            },
        }
    }
}
