//! Orchestrates an agency onboarding run.
//!
//! A run validates the agency, loads the workflow configuration, creates the
//! epic with its children and finally publishes the adoption table update.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::adoption::{contains_agency, insert_adoption_row, AdoptionRow, TableMutation};
use crate::agency::AgencyInput;
use crate::config::{load_workflow_config, AdoptionSettings, WorkflowConfig};
use crate::epic::create_epic;
use crate::publication::{publish, AdoptionStatus, PublicationRequest};
use crate::summary::RunSummary;
use crate::templates::{
    generate_branch_name, generate_child_title, generate_epic_title, generate_pr_title,
    TemplateRenderer,
};
use crate::tracker::{OctocrabTracker, Tracker};
use tracing::{error, info, warn};

/// Runs the onboarding workflow against a tracker.
pub struct Runner<T: Tracker = OctocrabTracker> {
    config: RunnerConfig,
    tracker: T,
}

impl Runner<OctocrabTracker> {
    /// Builds a runner talking to GitHub with the configured token.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Tracker`] if the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let tracker = OctocrabTracker::with_token(config.token())?;
        Ok(Self::with_tracker(config, tracker))
    }
}

impl<T: Tracker> Runner<T> {
    /// Builds a runner on top of an existing tracker.
    pub fn with_tracker(config: RunnerConfig, tracker: T) -> Self {
        Self { config, tracker }
    }

    /// Returns the tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Executes the full onboarding flow for one agency.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] for invalid input or configuration, when the
    /// epic cannot be created, and when publication fails. A publication
    /// failure is [`RunnerError::AdoptionFailed`], which still carries the
    /// summary. Child issue failures and link failures are reported in the
    /// [`RunSummary`].
    pub async fn run(&self, agency: &AgencyInput) -> Result<RunSummary, RunnerError> {
        agency.validate()?;
        let workflow = load_workflow_config(self.config.assets_path())?;
        let renderer = TemplateRenderer::new(self.config.assets_path());
        let mut summary = RunSummary::new(self.config.dry_run());

        info!(
            agency = %agency.long_name(),
            repo = %self.config.repository(),
            dry_run = self.config.dry_run(),
            "Starting onboarding"
        );

        if self.config.dry_run() {
            summary.adoption = print_dry_run_preview(agency, &workflow, &renderer, &self.config);
            return Ok(summary);
        }

        let outcome = create_epic(
            &self.tracker,
            self.config.repository(),
            &renderer,
            agency,
            &workflow.epic,
        )
        .await?;
        summary.record_epic(&outcome);

        for warning in &summary.link_warnings {
            warn!(%warning, "Sub-issue link missing");
        }
        for failure in &summary.children_failed {
            error!(title = %failure.title, error = %failure.error, "Child issue not created");
        }

        let epic = outcome.epic.number;
        let adoption = if self.config.skip_adoption_table() {
            info!("Adoption table update disabled");
            AdoptionStatus::skipped("disabled")
        } else {
            match self
                .update_adoption_table(agency, &workflow.adoption, epic)
                .await
            {
                Ok(status) => status,
                Err(e) => {
                    error!(epic, error = %e, "Adoption table update failed");
                    summary.adoption = AdoptionStatus::Failed {
                        error: e.to_string(),
                    };
                    return Err(RunnerError::AdoptionFailed {
                        epic,
                        summary: Box::new(summary),
                        source: Box::new(e),
                    });
                }
            }
        };
        summary.adoption = adoption;

        info!(
            epic,
            issues = summary.issue_numbers.len(),
            adoption = summary.adoption.as_str(),
            "Onboarding complete"
        );
        Ok(summary)
    }

    /// Adds the agency to the adoption table and publishes the change.
    async fn update_adoption_table(
        &self,
        agency: &AgencyInput,
        settings: &AdoptionSettings,
        epic_number: u64,
    ) -> Result<AdoptionStatus, RunnerError> {
        let repo = self.config.repository();
        let document = self
            .tracker
            .get_file(repo, &settings.document_path, &settings.base_branch)
            .await?;

        if contains_agency(&document.content, &settings.table_marker, agency.long_name()) {
            info!(agency = %agency.long_name(), "Agency already in adoption table");
            return Ok(AdoptionStatus::skipped("already listed"));
        }

        let update = insert_adoption_row(&document.content, agency, &settings.table_marker);
        match update.outcome {
            TableMutation::Inserted { .. } => {}
            TableMutation::TableNotFound => {
                warn!(path = %settings.document_path, "Adoption table marker not found");
                return Ok(AdoptionStatus::skipped("table not found"));
            }
            TableMutation::TableEndNotFound => {
                warn!(path = %settings.document_path, "No table under adoption marker");
                return Ok(AdoptionStatus::skipped("table end not found"));
            }
        }

        let request = PublicationRequest::for_agency(
            agency,
            epic_number,
            &settings.document_path,
            &settings.base_branch,
            update.document,
        );
        let change = publish(&self.tracker, repo, &request).await?;
        Ok(change.into())
    }
}

fn print_dry_run_preview(
    agency: &AgencyInput,
    workflow: &WorkflowConfig,
    renderer: &TemplateRenderer,
    config: &RunnerConfig,
) -> AdoptionStatus {
    println!("\n[DRY RUN] Onboarding: {}", agency.long_name());
    println!("  Repository: {}", config.repository());
    println!(
        "  Would create epic: \"{}\" with labels {:?}",
        generate_epic_title(agency),
        workflow.epic.labels
    );
    preview_body(renderer, &workflow.epic.parent_template, agency);

    if let Some(number) = agency.initiative_issue() {
        println!("  Would link epic under initiative #{number}");
    }

    let count = workflow.epic.children.len();
    for (i, child) in workflow.epic.children.iter().enumerate() {
        println!(
            "  [{}/{}] Would create child: \"{}\"",
            i + 1,
            count,
            generate_child_title(agency, &child.title)
        );
        preview_body(renderer, &child.template, agency);
    }

    if config.skip_adoption_table() {
        println!();
        return AdoptionStatus::skipped("disabled");
    }

    let row = AdoptionRow::for_agency(agency).render(&[]);
    println!(
        "  Would add to {} on branch {}:",
        workflow.adoption.document_path,
        generate_branch_name(agency)
    );
    println!("    {row}");
    println!("  Would open draft PR: \"{}\"", generate_pr_title(agency));
    println!();

    AdoptionStatus::Previewed { row }
}

fn preview_body(renderer: &TemplateRenderer, template: &str, agency: &AgencyInput) {
    match renderer.render(template, agency) {
        Ok(body) => {
            for line in body.lines().take(5) {
                println!("      {line}");
            }
            if body.lines().count() > 5 {
                println!("      ...");
            }
        }
        Err(e) => println!("      Would fail: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::tracker::{InMemoryTracker, Operation, RepoContext};
    use std::fs;
    use tempfile::TempDir;

    const DOCUMENT: &str = "# Benefits\n\n## Adoption by transit providers\n\n| Transit provider | Launch date |\n| --- | --- |\n| **Existing Agency** | 1/2024 |\n";

    fn assets() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[[epic.children]]\ntemplate = \"task.md\"\ntitle = \"Task\"\n",
        )
        .unwrap();
        fs::write(temp.path().join("parent.md"), "Epic for {{LONG_NAME}}").unwrap();
        fs::write(temp.path().join("task.md"), "Task for {{SHORT_NAME}}").unwrap();
        temp
    }

    fn runner(assets: &TempDir, dry_run: bool) -> Runner<InMemoryTracker> {
        let config = RunnerConfig::new(
            assets.path().to_path_buf(),
            "token".to_string(),
            RepoContext::new("cal-itp", "benefits"),
            dry_run,
        );
        let tracker = InMemoryTracker::new().with_file("docs/index.md", DOCUMENT);
        Runner::with_tracker(config, tracker)
    }

    fn agency(long_name: &str) -> AgencyInput {
        AgencyInput::new(long_name, "MST", "Littlepay")
    }

    #[tokio::test]
    async fn runs_full_flow() {
        let assets = assets();
        let runner = runner(&assets, false);

        let summary = runner.run(&agency("Monterey-Salinas Transit")).await.unwrap();

        assert_eq!(summary.issue_numbers, vec![1, 2]);
        assert_eq!(summary.children_created, 1);
        assert!(!summary.has_failures());
        assert_eq!(summary.adoption.as_str(), "published");

        let prs = runner.tracker().pull_requests();
        assert_eq!(prs.len(), 1);
        assert!(prs[0].body.contains("#1"));
        let document = runner.tracker().file("docs/index.md").unwrap();
        assert!(document.contains("| **Monterey-Salinas Transit**"));
    }

    #[tokio::test]
    async fn skips_listed_agency() {
        let assets = assets();
        let runner = runner(&assets, false);

        let summary = runner.run(&agency("Existing Agency")).await.unwrap();

        assert_eq!(summary.adoption, AdoptionStatus::skipped("already listed"));
        assert_eq!(runner.tracker().count(Operation::CreateBranch), 0);
        assert_eq!(runner.tracker().file("docs/index.md").as_deref(), Some(DOCUMENT));
    }

    #[tokio::test]
    async fn failed_publication_keeps_summary() {
        let assets = assets();
        let runner = runner(&assets, false);
        runner.tracker().fail_on(Operation::AddSubIssue);
        runner.tracker().fail_on(Operation::CreatePullRequest);

        let err = runner
            .run(&agency("Monterey-Salinas Transit"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunnerError::AdoptionFailed { epic: 1, .. }));
        assert!(err.to_string().starts_with("Epic #1 created, adoption table update failed:"));
        let summary = err.partial_summary().unwrap();
        assert_eq!(summary.issue_numbers, vec![1, 2]);
        assert_eq!(summary.link_warnings.len(), 1);
        assert!(matches!(summary.adoption, AdoptionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn dry_run_makes_no_calls() {
        let assets = assets();
        let runner = runner(&assets, true);

        let summary = runner.run(&agency("Monterey-Salinas Transit")).await.unwrap();

        assert!(summary.dry_run);
        assert!(runner.tracker().calls().is_empty());
        assert!(matches!(summary.adoption, AdoptionStatus::Previewed { .. }));
    }

    #[tokio::test]
    async fn invalid_agency_makes_no_calls() {
        let assets = assets();
        let runner = runner(&assets, false);

        let result = runner.run(&agency("  ")).await;

        assert!(matches!(result, Err(RunnerError::Agency(_))));
        assert!(runner.tracker().calls().is_empty());
    }

    #[tokio::test]
    async fn skip_flag_leaves_table_alone() {
        let assets = assets();
        let config = RunnerConfig::new(
            assets.path().to_path_buf(),
            "token".to_string(),
            RepoContext::new("cal-itp", "benefits"),
            false,
        )
        .with_skip_adoption_table(true);
        let runner = Runner::with_tracker(config, InMemoryTracker::new());

        let summary = runner.run(&agency("Monterey-Salinas Transit")).await.unwrap();

        assert_eq!(summary.adoption, AdoptionStatus::skipped("disabled"));
        assert_eq!(runner.tracker().count(Operation::GetFile), 0);
    }
}
