//! Command handlers for the Waypoint CLI.
//!
//! Each handler drives the core planner and writes its result through the
//! [`TerminalRenderer`]. Plan files enter the planner through
//! [`FileProposer`], so they get exactly the validation a live proposer's
//! output would.

use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use waypoint_core::{
    CreateResult, Levels, OperationStatus, Plan, PlanEvent, PlanStats, PlanStatus, PlanProposer,
    PlannerBuilder, ProposedPlan, UpdateResult, analyzer, params::CreateSimplePlan, validation,
};

use crate::{
    args::{AnalyzeArgs, ChainArgs, PlanFileArgs, RunArgs},
    renderer::TerminalRenderer,
};

/// Contents of a plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanFile {
    pub goal: String,
    /// Extra context handed to the proposer
    #[serde(default)]
    pub context: String,
    #[serde(flatten)]
    pub proposal: ProposedPlan,
}

impl PlanFile {
    /// Read and parse a plan file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse plan file {}", path.display()))
    }
}

/// Proposer that hands back a plan loaded from disk.
pub struct FileProposer {
    proposal: ProposedPlan,
}

impl FileProposer {
    pub fn new(proposal: ProposedPlan) -> Self {
        Self { proposal }
    }
}

#[async_trait]
impl PlanProposer for FileProposer {
    fn name(&self) -> &str {
        "plan-file"
    }

    async fn propose(&self, goal: &str, _context: &str) -> Result<ProposedPlan> {
        debug!("proposing {} step(s) from file for '{goal}'", self.proposal.steps.len());
        Ok(self.proposal.clone())
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    plan: &'a Plan,
    events: &'a [PlanEvent],
    stats: &'a PlanStats,
}

/// Command handler bound to one renderer.
pub struct Cli {
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer) -> Self {
        Self { renderer }
    }

    /// Classify a goal and suggest a strategy.
    pub fn analyze(&self, args: &AnalyzeArgs) -> Result<()> {
        let analysis = analyzer::analyze_goal(&args.goal);
        let strategy = analyzer::suggest_strategy(&analysis);

        let markdown = format!("# Analysis\n\n{analysis}\n## Strategy\n\n{strategy}");
        self.renderer.emit(
            &markdown,
            &json!({ "goal": args.goal, "analysis": analysis, "strategy": strategy }),
        )
    }

    /// Build a linear plan from titles.
    pub fn chain(&self, args: ChainArgs) -> Result<()> {
        let planner = PlannerBuilder::new().build();
        let plan = planner
            .create_simple_plan(&CreateSimplePlan::from(args))
            .context("Failed to create plan")?;

        self.renderer
            .emit(&CreateResult::new(plan.clone()).to_string(), &plan)
    }

    /// Validate a plan file without creating anything.
    pub fn validate(&self, args: &PlanFileArgs) -> Result<()> {
        let file = PlanFile::load(&args.file)?;
        let steps: Vec<_> = file
            .proposal
            .steps
            .into_iter()
            .enumerate()
            .map(|(order, step)| step.into_step(order as u32))
            .collect();
        let result = validation::validate_graph(&steps, &file.proposal.dependencies);
        let status = OperationStatus::from(&result);

        self.renderer.emit(&format!("{status}\n{result}"), &result)?;
        if !result.is_valid {
            bail!("{}", status.message);
        }
        Ok(())
    }

    /// Create a plan from a file and show it with its levels.
    pub async fn show(&self, args: &PlanFileArgs) -> Result<()> {
        let file = PlanFile::load(&args.file)?;
        let planner = PlannerBuilder::new()
            .with_proposer(FileProposer::new(file.proposal))
            .build();
        let plan = planner
            .create_plan(&file.goal, &file.context)
            .await
            .context("Failed to create plan")?;

        let levels = Levels(planner.get_parallelizable_steps(plan.id).unwrap_or_default());
        let markdown = format!(
            "{}\n## Parallel levels\n\n{levels}\n- Depth: {}\n- Widest level: {}\n",
            CreateResult::new(plan.clone()),
            levels.depth(),
            levels.max_width(),
        );
        self.renderer.emit(
            &markdown,
            &json!({ "plan": plan, "levels": levels.0 }),
        )
    }

    /// Simulate an executor: run every step in dependency order.
    pub async fn run(&self, args: &RunArgs) -> Result<()> {
        let file = PlanFile::load(&args.plan.file)?;
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let planner = PlannerBuilder::new()
            .with_proposer(FileProposer::new(file.proposal))
            .with_listener(move |event: &PlanEvent| {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(event.clone());
            })
            .build();

        let plan = planner
            .create_plan(&file.goal, &file.context)
            .await
            .context("Failed to create plan")?;
        planner.approve_plan(plan.id)?;
        planner.start_plan(plan.id)?;

        while planner
            .get_plan(plan.id)
            .is_some_and(|plan| plan.status == PlanStatus::InProgress)
        {
            let Some(step) = planner.start_next_step(plan.id)? else {
                break;
            };
            if args.fail.as_deref() == Some(step.id.as_str()) {
                info!("failing step '{}' on request", step.id);
                planner.fail_step(plan.id, &step.id, "failure requested")?;
            } else if args.skip.contains(&step.id) {
                planner.skip_step(plan.id, &step.id)?;
            } else {
                planner.complete_step(plan.id, &step.id, Some(format!("{} done", step.title)))?;
            }
        }

        let plan = planner
            .get_plan(plan.id)
            .context("Plan disappeared during the run")?;
        let stats = planner.get_stats();
        let events = events.lock().unwrap_or_else(PoisonError::into_inner).clone();

        let changes = events.iter().map(ToString::to_string).collect();
        let markdown = format!(
            "{}\n## Stats\n\n{stats}",
            UpdateResult::with_changes(plan.clone(), changes)
        );
        self.renderer.emit(
            &markdown,
            &RunReport {
                plan: &plan,
                events: &events,
                stats: &stats,
            },
        )
    }
}
