//! Execution strategy chosen for a plan.

use serde::{Deserialize, Serialize};

/// Overall approach for carrying out a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Small verified slices, one after another
    #[default]
    Incremental,
    /// Everything at once
    BigBang,
    /// Investigate first, then commit to an implementation
    SpikeFirst,
    /// Write the tests before the change
    TestFirst,
    /// Independent branches run side by side
    Parallel,
}

impl Approach {
    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Approach::Incremental => "incremental",
            Approach::BigBang => "big_bang",
            Approach::SpikeFirst => "spike_first",
            Approach::TestFirst => "test_first",
            Approach::Parallel => "parallel",
        }
    }
}

/// An approach that was considered and not chosen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlternativeApproach {
    pub approach: Approach,
    pub trade_off: String,
}

/// The chosen approach plus why it was chosen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanStrategy {
    pub approach: Approach,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Vec<AlternativeApproach>,
}

impl PlanStrategy {
    /// Creates a strategy with no recorded alternatives.
    pub fn new(approach: Approach, reasoning: impl Into<String>) -> Self {
        Self {
            approach,
            reasoning: reasoning.into(),
            alternatives: Vec::new(),
        }
    }

    /// Records an alternative that was considered.
    pub fn with_alternative(mut self, approach: Approach, trade_off: impl Into<String>) -> Self {
        self.alternatives.push(AlternativeApproach {
            approach,
            trade_off: trade_off.into(),
        });
        self
    }
}
