//! Keyword-based classification of free-text goals.
//!
//! The analyzer is best-effort and infallible: when nothing matches it falls
//! back to [`Scope::Module`] and [`Complexity::Moderate`].

use crate::models::{Approach, Complexity, PlanStrategy, ProblemAnalysis, Scope};

/// Scope tiers, widest first. The first tier with a matching phrase wins.
const SCOPE_RULES: &[(Scope, &[&str])] = &[
    (
        Scope::ProjectWide,
        &[
            "entire project",
            "whole project",
            "entire codebase",
            "whole codebase",
            "project-wide",
            "project wide",
            "across the codebase",
        ],
    ),
    (
        Scope::CrossModule,
        &[
            "across modules",
            "multiple modules",
            "several modules",
            "cross-module",
            "cross module",
        ],
    ),
    (
        Scope::MultiFile,
        &["multiple files", "several files", "few files", "two files"],
    ),
    (
        Scope::SingleFile,
        &["single file", "this file", "one file", "typo"],
    ),
];

/// Complexity tiers, hardest first.
const COMPLEXITY_RULES: &[(Complexity, &[&str])] = &[
    (
        Complexity::VeryComplex,
        &["rewrite", "from scratch", "re-architect", "rearchitect"],
    ),
    (
        Complexity::Complex,
        &["major redesign", "redesign", "overhaul", "migrate", "migration"],
    ),
    (Complexity::Trivial, &["typo", "rename", "comment"]),
    (Complexity::Simple, &["small", "simple", "minor", "tweak"]),
];

const UNKNOWN_MARKERS: &[&str] = &["not sure", "unclear", "investigate", "figure out", "unknown"];

const AREAS: &[&str] = &[
    "api", "auth", "database", "cli", "config", "tests", "ui", "docs", "build", "logging",
];

/// Classify a goal into scope and complexity.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::analyzer::analyze_goal;
/// use waypoint_core::models::{Complexity, Scope};
///
/// let analysis = analyze_goal("Major redesign of the entire project");
/// assert_eq!(analysis.scope, Scope::ProjectWide);
/// assert_eq!(analysis.complexity, Complexity::Complex);
/// ```
pub fn analyze_goal(text: &str) -> ProblemAnalysis {
    let lowered = text.to_lowercase();

    let scope = first_match(&lowered, SCOPE_RULES).unwrap_or_default();
    let complexity = first_match(&lowered, COMPLEXITY_RULES).unwrap_or_default();

    let mut unknowns: Vec<String> = UNKNOWN_MARKERS
        .iter()
        .filter(|marker| lowered.contains(*marker))
        .map(|marker| format!("goal mentions '{marker}'"))
        .collect();
    if lowered.contains('?') {
        unknowns.push("goal is phrased as a question".to_string());
    }

    let affected_areas = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| AREAS.contains(word))
        .fold(Vec::new(), |mut areas: Vec<String>, word| {
            if !areas.iter().any(|a| a == word) {
                areas.push(word.to_string());
            }
            areas
        });

    log::debug!(
        "analyzed goal: scope={} complexity={} unknowns={}",
        scope.as_str(),
        complexity.as_str(),
        unknowns.len()
    );

    ProblemAnalysis {
        scope,
        complexity,
        affected_areas,
        unknowns,
        ..Default::default()
    }
}

fn first_match<T: Copy>(text: &str, rules: &[(T, &[&str])]) -> Option<T> {
    rules
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| text.contains(phrase)))
        .map(|(value, _)| *value)
}

/// Suggest how to carry out a goal with the given analysis.
///
/// Open unknowns take priority: investigate before committing. Otherwise
/// large scopes and everything else go incremental.
pub fn suggest_strategy(analysis: &ProblemAnalysis) -> PlanStrategy {
    if !analysis.unknowns.is_empty() {
        PlanStrategy::new(
            Approach::SpikeFirst,
            format!(
                "{} open question(s) should be answered before committing to an implementation",
                analysis.unknowns.len()
            ),
        )
        .with_alternative(
            Approach::Incremental,
            "starts delivering sooner but may build on wrong assumptions",
        )
    } else if analysis.scope.is_large() {
        PlanStrategy::new(
            Approach::Incremental,
            format!(
                "{} scope: small verified slices keep the blast radius contained",
                analysis.scope.as_str()
            ),
        )
        .with_alternative(
            Approach::BigBang,
            "fewer intermediate states but one failure affects everything",
        )
        .with_alternative(
            Approach::Parallel,
            "faster when branches are independent but harder to integrate",
        )
    } else {
        PlanStrategy::new(
            Approach::Incremental,
            "contained change: proceed step by step and verify as you go",
        )
        .with_alternative(
            Approach::TestFirst,
            "pins behavior down up front at the cost of a slower start",
        )
    }
}
