//! Display implementations for domain models.
//!
//! Models render as markdown for the terminal renderer. Enumerations render
//! as their stable snake_case names, which is also what error messages use.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    events::PlanEvent,
    models::{
        Approach, Complexity, EffortEstimate, Impact, Plan, PlanRisk, PlanStats, PlanStatus,
        PlanStrategy, PlanSummary, ProblemAnalysis, RiskLevel, Scope, Step, StepStatus, StepType,
    },
    validation::PlanValidation,
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    PlanStatus, StepStatus, StepType, Scope, Complexity, Approach, Impact, RiskLevel,
);

fn write_list(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
    if !items.is_empty() {
        writeln!(f, "- {label}: {}", items.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.goal)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(
            f,
            "- Progress: {}/{} ({:.0}%)",
            self.resolved_count(),
            self.steps.len(),
            self.progress() * 100.0
        )?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        writeln!(f, "\n## Analysis\n")?;
        write!(f, "{}", self.analysis)?;

        writeln!(f, "\n## Strategy\n")?;
        write!(f, "{}", self.strategy)?;

        writeln!(f, "\n## Estimate\n")?;
        write!(f, "{}", self.estimate)?;

        if !self.risks.is_empty() {
            writeln!(f, "\n## Risks\n")?;
            for risk in &self.risks {
                write!(f, "{risk}")?;
            }
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                let status = self.effective_status(&step.id).unwrap_or(step.status);
                let deps = self.dependencies.get(&step.id).map_or(&[][..], Vec::as_slice);
                step.fmt_step(f, status, deps)?;
            }
        }

        Ok(())
    }
}

impl Step {
    /// Format the step, showing `status` in place of the stored one.
    ///
    /// Inside a plan, pending steps that cannot start yet show as blocked.
    fn fmt_step(
        &self,
        f: &mut fmt::Formatter<'_>,
        status: StepStatus,
        depends_on: &[String],
    ) -> fmt::Result {
        writeln!(f, "### {}. {} ({})", self.id, self.title, status.with_icon())?;
        writeln!(f)?;

        writeln!(f, "- Type: {}", self.step_type)?;
        if !depends_on.is_empty() {
            writeln!(f, "- Depends on: {}", depends_on.join(", "))?;
        }
        if self.estimated_tokens > 0 {
            writeln!(f, "- Tokens: {}", self.estimated_tokens)?;
        }
        if self.parallelizable {
            writeln!(f, "- Parallelizable")?;
        }
        if !self.verification.is_empty() {
            writeln!(f, "- Verify: {}", self.verification)?;
        }
        if let Some(rollback) = &self.rollback {
            writeln!(f, "- Rollback: {rollback}")?;
        }
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        // Show result only for completed steps
        if status == StepStatus::Completed
            && let Some(result) = &self.result
        {
            writeln!(f, "#### Result")?;
            writeln!(f)?;
            writeln!(f, "{result}")?;
            writeln!(f)?;
        }

        if status == StepStatus::Failed
            && let Some(error) = &self.error
        {
            writeln!(f, "#### Error")?;
            writeln!(f)?;
            writeln!(f, "{error}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f, self.status, &[])
    }
}

impl fmt::Display for ProblemAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Scope: {}", self.scope)?;
        writeln!(
            f,
            "- Complexity: {} (difficulty {}/10)",
            self.complexity,
            self.difficulty()
        )?;
        write_list(f, "Affected areas", &self.affected_areas)?;
        write_list(f, "Existing patterns", &self.existing_patterns)?;
        write_list(f, "Constraints", &self.constraints)?;
        write_list(f, "Unknowns", &self.unknowns)?;
        if self.needs_investigation() {
            writeln!(f, "- Needs investigation before implementation")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**{}**: {}", self.approach, self.reasoning)?;
        if !self.alternatives.is_empty() {
            writeln!(f)?;
            writeln!(f, "Alternatives:")?;
            for alternative in &self.alternatives {
                writeln!(f, "- {}: {}", alternative.approach, alternative.trade_off)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EffortEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Steps: {}", self.total_steps)?;
        writeln!(f, "- Tokens: {}", self.total_tokens)?;
        writeln!(f, "- Duration: {}", self.formatted_duration())?;
        writeln!(f, "- Confidence: {:.0}%", self.confidence * 100.0)?;
        if !self.by_type.is_empty() {
            let counts: Vec<String> = self
                .by_type
                .iter()
                .map(|(step_type, count)| format!("{step_type} {count}"))
                .collect();
            writeln!(f, "- By type: {}", counts.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** {} (probability {:.0}%, impact {})",
            self.level(),
            self.description,
            self.probability * 100.0,
            self.impact
        )?;
        if !self.mitigation.is_empty() {
            writeln!(f, "  - Mitigation: {}", self.mitigation)?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_steps > 0 {
            format!(
                " ({}/{})",
                self.completed_steps + self.skipped_steps,
                self.total_steps
            )
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.goal, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status)?;
        if self.skipped_steps > 0 {
            writeln!(f, "- **Skipped**: {}", self.skipped_steps)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for PlanValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return writeln!(f, "Plan is valid.");
        }
        writeln!(f, "Plan is invalid:")?;
        writeln!(f)?;
        for error in &self.errors {
            writeln!(f, "- {error}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Total: {}", self.total)?;
        let counts = [
            ("Draft", self.draft),
            ("Approved", self.approved),
            ("In progress", self.in_progress),
            ("Completed", self.completed),
            ("Failed", self.failed),
            ("Cancelled", self.cancelled),
        ];
        for (label, count) in counts.into_iter().filter(|(_, count)| *count > 0) {
            writeln!(f, "- {label}: {count}")?;
        }
        writeln!(f, "- Success rate: {:.0}%", self.success_rate * 100.0)
    }
}

impl fmt::Display for PlanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan_id = self.plan_id();
        match self {
            PlanEvent::PlanCreated { goal, .. } => write!(f, "plan {plan_id} created: {goal}"),
            PlanEvent::PlanApproved { .. } => write!(f, "plan {plan_id} approved"),
            PlanEvent::PlanStarted { .. } => write!(f, "plan {plan_id} started"),
            PlanEvent::PlanCompleted { .. } => write!(f, "plan {plan_id} completed"),
            PlanEvent::PlanFailed { step_id, error, .. } => {
                write!(f, "plan {plan_id} failed at step '{step_id}': {error}")
            }
            PlanEvent::PlanCancelled { .. } => write!(f, "plan {plan_id} cancelled"),
            PlanEvent::StepStarted { step_id, .. } => {
                write!(f, "plan {plan_id}: step '{step_id}' started")
            }
            PlanEvent::StepCompleted {
                step_id, output, ..
            } => {
                write!(f, "plan {plan_id}: step '{step_id}' completed")?;
                if let Some(output) = output {
                    write!(f, " ({output})")?;
                }
                Ok(())
            }
            PlanEvent::StepFailed { step_id, error, .. } => {
                write!(f, "plan {plan_id}: step '{step_id}' failed: {error}")
            }
            PlanEvent::StepSkipped { step_id, .. } => {
                write!(f, "plan {plan_id}: step '{step_id}' skipped")
            }
            PlanEvent::StepAdded { step_id, .. } => {
                write!(f, "plan {plan_id}: step '{step_id}' added")
            }
            PlanEvent::StepRemoved { step_id, .. } => {
                write!(f, "plan {plan_id}: step '{step_id}' removed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::DependencyMap;

    fn create_test_plan() -> Plan {
        let mut steps = vec![Step::new("A", 0, "Design schema"), Step::new("B", 1, "Write loader")];
        steps[0].status = StepStatus::InProgress;
        let dependencies: DependencyMap = [("B".to_string(), vec!["A".to_string()])]
            .into_iter()
            .collect();
        let created = Timestamp::from_second(1640995200).unwrap(); // 2022-01-01 00:00:00 UTC

        Plan {
            id: 3,
            goal: "Add a config loader".to_string(),
            analysis: ProblemAnalysis::default(),
            strategy: PlanStrategy::new(Approach::Incremental, "Small steps"),
            estimate: EffortEstimate::from_steps(&steps, &ProblemAnalysis::default()),
            steps,
            dependencies,
            risks: vec![PlanRisk {
                description: "schema churn".to_string(),
                probability: 0.5,
                impact: Impact::High,
                mitigation: "freeze fields early".to_string(),
            }],
            status: PlanStatus::InProgress,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_status_display_uses_stable_names() {
        assert_eq!(PlanStatus::InProgress.to_string(), "in_progress");
        assert_eq!(StepStatus::Skipped.to_string(), "skipped");
        assert_eq!(StepType::Research.to_string(), "research");
        assert_eq!(Approach::SpikeFirst.to_string(), "spike_first");
    }

    #[test]
    fn test_plan_display_sections() {
        let output = create_test_plan().to_string();

        assert!(output.starts_with("# 3. Add a config loader"));
        assert!(output.contains("- Status: in_progress"));
        assert!(output.contains("- Progress: 0/2 (0%)"));
        assert!(output.contains("## Strategy"));
        assert!(output.contains("**incremental**: Small steps"));
        assert!(output.contains("**medium** schema churn"));
        assert!(output.contains("### A. Design schema (➤ In Progress)"));
        // B waits on A, so it shows as blocked
        assert!(output.contains("### B. Write loader (⏸ Blocked)"));
        assert!(output.contains("- Depends on: A"));
    }

    #[test]
    fn test_step_display_shows_result_and_error() {
        let step = Step::new("1", 0, "Run migrations").completed(Some("3 applied".to_string()));
        let output = step.to_string();
        assert!(output.contains("✓ Completed"));
        assert!(output.contains("#### Result"));
        assert!(output.contains("3 applied"));

        let failed = Step::new("2", 1, "Seed data").failed("constraint violated");
        let output = failed.to_string();
        assert!(output.contains("#### Error"));
        assert!(!output.contains("#### Result"));
    }

    #[test]
    fn test_validation_display() {
        let valid = PlanValidation {
            is_valid: true,
            errors: vec![],
        };
        assert_eq!(valid.to_string(), "Plan is valid.\n");

        let invalid = PlanValidation {
            is_valid: false,
            errors: vec!["step 'B' depends on unknown step 'Z'".to_string()],
        };
        let output = invalid.to_string();
        assert!(output.starts_with("Plan is invalid:"));
        assert!(output.contains("- step 'B' depends on unknown step 'Z'"));
    }

    #[test]
    fn test_stats_display_skips_empty_counts() {
        let stats = PlanStats {
            total: 2,
            completed: 1,
            failed: 1,
            success_rate: 0.5,
            ..Default::default()
        };
        let output = stats.to_string();

        assert!(output.contains("- Completed: 1"));
        assert!(!output.contains("Draft"));
        assert!(output.contains("- Success rate: 50%"));
    }

    #[test]
    fn test_event_display() {
        let event = PlanEvent::PlanFailed {
            plan_id: 4,
            step_id: "B".to_string(),
            error: "timeout".to_string(),
            timestamp: Timestamp::now(),
        };
        assert_eq!(event.to_string(), "plan 4 failed at step 'B': timeout");
    }
}
