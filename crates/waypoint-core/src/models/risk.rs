//! Risks recorded against a plan.

use serde::{Deserialize, Serialize};

/// Impact of a risk materializing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

impl Impact {
    /// Numeric weight in `1..=4`.
    pub fn weight(&self) -> u8 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 2,
            Impact::High => 3,
            Impact::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
            Impact::Critical => "critical",
        }
    }
}

/// Bucketed risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Something that could go wrong while carrying out the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRisk {
    pub description: String,
    /// Probability in `[0, 1]`
    pub probability: f64,
    pub impact: Impact,
    #[serde(default)]
    pub mitigation: String,
}

impl PlanRisk {
    /// Probability times impact weight.
    pub fn score(&self) -> f64 {
        self.probability * f64::from(self.impact.weight())
    }

    /// Score bucketed at 1.0 and 2.0.
    pub fn level(&self) -> RiskLevel {
        match self.score() {
            s if s >= 2.0 => RiskLevel::High,
            s if s >= 1.0 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}
