//! Command-line argument definitions using clap.
//!
//! Argument structs stay in this crate and convert into the interface-neutral
//! parameter types of `waypoint_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use waypoint_core::params::CreateSimplePlan;

/// Dependency-graph planner for multi-step work.
///
/// Waypoint breaks a goal into steps with explicit dependencies, checks the
/// graph for cycles and dangling references, and schedules the steps in
/// dependency order.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print machine-readable JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Classify a goal and suggest a strategy
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),
    /// Build a linear plan from step titles
    #[command(alias = "c")]
    Chain(ChainArgs),
    /// Check a plan file's dependency graph
    #[command(alias = "v")]
    Validate(PlanFileArgs),
    /// Create a plan from a file and show it with its dependency levels
    #[command(alias = "s")]
    Show(PlanFileArgs),
    /// Simulate executing a plan file step by step
    #[command(alias = "r")]
    Run(RunArgs),
}

/// Analyze a goal
#[derive(ClapArgs)]
pub struct AnalyzeArgs {
    /// Free-text description of the goal
    pub goal: String,
}

/// Build a linear plan
#[derive(ClapArgs)]
pub struct ChainArgs {
    /// Goal the plan works towards
    pub goal: String,
    /// Step titles, in execution order
    #[arg(required = true)]
    pub titles: Vec<String>,
}

impl From<ChainArgs> for CreateSimplePlan {
    fn from(val: ChainArgs) -> Self {
        CreateSimplePlan {
            goal: val.goal,
            titles: val.titles,
        }
    }
}

/// A plan file on disk
#[derive(ClapArgs)]
pub struct PlanFileArgs {
    /// Path to a JSON plan file
    #[arg(help = "JSON file with goal, steps and dependencies")]
    pub file: PathBuf,
}

/// Simulate a run
#[derive(ClapArgs)]
pub struct RunArgs {
    #[command(flatten)]
    pub plan: PlanFileArgs,
    /// Fail this step when it is reached
    #[arg(long, value_name = "STEP")]
    pub fail: Option<String>,
    /// Skip these steps instead of completing them
    #[arg(long, value_name = "STEP", value_delimiter = ',')]
    pub skip: Vec<String>,
}
