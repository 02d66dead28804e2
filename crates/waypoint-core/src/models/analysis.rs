//! Problem analysis attached to every plan.

use serde::{Deserialize, Serialize};

/// How much of the codebase a goal touches, smallest first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    SingleFile,
    MultiFile,
    #[default]
    Module,
    CrossModule,
    ProjectWide,
}

impl Scope {
    /// Weight in `1..=5`, ascending with the breadth of the scope.
    pub fn weight(&self) -> u8 {
        match self {
            Scope::SingleFile => 1,
            Scope::MultiFile => 2,
            Scope::Module => 3,
            Scope::CrossModule => 4,
            Scope::ProjectWide => 5,
        }
    }

    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::SingleFile => "single_file",
            Scope::MultiFile => "multi_file",
            Scope::Module => "module",
            Scope::CrossModule => "cross_module",
            Scope::ProjectWide => "project_wide",
        }
    }

    /// Scopes wide enough that changes should land in small slices.
    pub fn is_large(&self) -> bool {
        *self >= Scope::CrossModule
    }
}

/// How hard a goal is, easiest first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    Simple,
    #[default]
    Moderate,
    Complex,
    VeryComplex,
}

impl Complexity {
    /// Weight in `1..=5`, ascending with difficulty.
    pub fn weight(&self) -> u8 {
        match self {
            Complexity::Trivial => 1,
            Complexity::Simple => 2,
            Complexity::Moderate => 3,
            Complexity::Complex => 4,
            Complexity::VeryComplex => 5,
        }
    }

    /// Stable string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Trivial => "trivial",
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
            Complexity::VeryComplex => "very_complex",
        }
    }
}

/// Scope and complexity classification of a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProblemAnalysis {
    pub scope: Scope,
    pub complexity: Complexity,
    #[serde(default)]
    pub affected_areas: Vec<String>,
    #[serde(default)]
    pub existing_patterns: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub unknowns: Vec<String>,
}

impl ProblemAnalysis {
    /// Creates an analysis with empty free-text lists.
    pub fn new(scope: Scope, complexity: Complexity) -> Self {
        Self {
            scope,
            complexity,
            ..Default::default()
        }
    }

    /// Scope weight plus complexity weight, in `2..=10`.
    pub fn difficulty(&self) -> u8 {
        self.scope.weight() + self.complexity.weight()
    }

    /// Whether the goal should be investigated before committing to a plan.
    pub fn needs_investigation(&self) -> bool {
        !self.unknowns.is_empty() || self.complexity == Complexity::VeryComplex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_bounds() {
        assert_eq!(
            ProblemAnalysis::new(Scope::SingleFile, Complexity::Simple).difficulty(),
            3
        );
        assert_eq!(
            ProblemAnalysis::new(Scope::ProjectWide, Complexity::VeryComplex).difficulty(),
            10
        );
        assert_eq!(
            ProblemAnalysis::new(Scope::SingleFile, Complexity::Trivial).difficulty(),
            2
        );
    }

    #[test]
    fn test_needs_investigation() {
        let mut analysis = ProblemAnalysis::new(Scope::Module, Complexity::Moderate);
        assert!(!analysis.needs_investigation());

        analysis.unknowns.push("which cache backend".to_string());
        assert!(analysis.needs_investigation());

        let hard = ProblemAnalysis::new(Scope::Module, Complexity::VeryComplex);
        assert!(hard.needs_investigation());
    }

    #[test]
    fn test_ordering_follows_weight() {
        assert!(Scope::SingleFile < Scope::ProjectWide);
        assert!(Complexity::Trivial < Complexity::VeryComplex);
        assert!(Scope::CrossModule.is_large());
        assert!(!Scope::Module.is_large());
    }
}
