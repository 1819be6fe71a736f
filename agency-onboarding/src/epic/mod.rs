//! Epic orchestration.
//!
//! Creates the onboarding epic, attaches it under the initiative issue when
//! one is given, then creates each child issue in order and links it under
//! the epic. Everything runs sequentially so each warning belongs to one child.

mod error;
mod outcome;
mod plan;

pub use error::EpicError;
pub use outcome::{ChildOutcome, ChildResult, EpicOutcome};
pub use plan::{ChildIssueDefinition, EpicPlan};

use crate::agency::AgencyInput;
use crate::issues::{create_issue, link_sub_issue, LinkOutcome, LinkWarning};
use crate::templates::{generate_child_title, generate_epic_title, TemplateRenderer};
use crate::tracker::{CreatedIssue, NewIssue, RepoContext, Tracker};
use tracing::{error, info, info_span, warn, Instrument};

/// Creates the epic and its child issues.
///
/// # Arguments
///
/// * `tracker` - Issue tracker
/// * `repo` - Repository the issues are created in
/// * `renderer` - Template renderer for the issue bodies
/// * `agency` - Agency being onboarded
/// * `plan` - Templates, labels and child definitions
///
/// # Returns
///
/// An [`EpicOutcome`] listing the epic and one entry per child. A child that
/// fails to render or create is recorded and the remaining children are still
/// processed; issues already created are kept.
///
/// # Errors
///
/// Returns [`EpicError`] only when the epic itself cannot be created.
pub async fn create_epic<T>(
    tracker: &T,
    repo: &RepoContext,
    renderer: &TemplateRenderer,
    agency: &AgencyInput,
    plan: &EpicPlan,
) -> Result<EpicOutcome, EpicError>
where
    T: Tracker + ?Sized,
{
    let span = info_span!(
        "create_epic",
        repo = %repo,
        agency = %agency.short_name(),
        children = plan.children.len()
    );

    async {
        let body = renderer.render(&plan.parent_template, agency)?;
        let epic = create_issue(
            tracker,
            repo,
            &NewIssue {
                title: generate_epic_title(agency),
                labels: plan.labels.clone(),
                body,
            },
        )
        .await?;
        info!(issue_number = epic.number, "Epic created");

        let initiative_link = match agency.initiative_issue() {
            Some(number) => Some(attach_to_initiative(tracker, repo, &epic, number).await),
            None => None,
        };

        let mut children = Vec::with_capacity(plan.children.len());
        for definition in &plan.children {
            children.push(create_child(tracker, repo, renderer, agency, plan, &epic, definition).await);
        }

        let outcome = EpicOutcome {
            epic,
            initiative_link,
            children,
        };
        info!(
            created = outcome.issue_numbers().len(),
            failed = outcome.failed_children(),
            warnings = outcome.warnings().len(),
            "Epic complete"
        );
        Ok(outcome)
    }
    .instrument(span)
    .await
}

/// Links the epic under the initiative issue.
///
/// A failed lookup is treated like a failed link.
async fn attach_to_initiative<T>(
    tracker: &T,
    repo: &RepoContext,
    epic: &CreatedIssue,
    initiative_number: u64,
) -> LinkOutcome
where
    T: Tracker + ?Sized,
{
    match tracker.get_issue(repo, initiative_number).await {
        Ok(initiative) => link_sub_issue(tracker, &initiative.node_id, &epic.node_id).await,
        Err(e) => {
            warn!(
                initiative = initiative_number,
                error = %e,
                "Failed to look up initiative issue"
            );
            LinkOutcome::Failed(LinkWarning {
                parent: format!("#{initiative_number}"),
                child: format!("#{}", epic.number),
                message: e.to_string(),
            })
        }
    }
}

async fn create_child<T>(
    tracker: &T,
    repo: &RepoContext,
    renderer: &TemplateRenderer,
    agency: &AgencyInput,
    plan: &EpicPlan,
    epic: &CreatedIssue,
    definition: &ChildIssueDefinition,
) -> ChildOutcome
where
    T: Tracker + ?Sized,
{
    let title = generate_child_title(agency, &definition.title);

    let created = match renderer.render(&definition.template, agency) {
        Ok(body) => {
            let issue = NewIssue {
                title: title.clone(),
                labels: plan.child_labels.clone(),
                body,
            };
            create_issue(tracker, repo, &issue)
                .await
                .map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    };

    let result = match created {
        Ok(issue) => {
            let link = link_sub_issue(tracker, &epic.node_id, &issue.node_id).await;
            ChildResult::Created { issue, link }
        }
        Err(message) => {
            error!(title = %title, error = %message, "Failed to create child issue");
            ChildResult::Failed { error: message }
        }
    };

    ChildOutcome { title, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{InMemoryTracker, Operation, TrackerCall};
    use std::fs;
    use tempfile::TempDir;

    fn repo() -> RepoContext {
        RepoContext::new("cal-itp", "benefits")
    }

    fn sample_agency() -> AgencyInput {
        AgencyInput::new("Monterey-Salinas Transit", "MST", "Littlepay")
    }

    fn renderer() -> (TempDir, TemplateRenderer) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("parent.md"), "Onboard {{LONG_NAME}}").unwrap();
        fs::write(temp.path().join("processor.md"), "Processor: {{TRANSIT_PROCESSOR}}").unwrap();
        fs::write(temp.path().join("eligibility.md"), "Eligibility for {{SHORT_NAME}}").unwrap();
        let renderer = TemplateRenderer::new(temp.path());
        (temp, renderer)
    }

    fn plan(children: usize) -> EpicPlan {
        let definitions = (0..children)
            .map(|i| {
                let template = if i % 2 == 0 { "processor.md" } else { "eligibility.md" };
                ChildIssueDefinition::new(template, format!("Task {i}"))
            })
            .collect();
        EpicPlan::default().with_children(definitions)
    }

    #[tokio::test]
    async fn creates_parent_then_children_in_order() {
        let tracker = InMemoryTracker::new();
        let (_temp, renderer) = renderer();

        let outcome = create_epic(&tracker, &repo(), &renderer, &sample_agency(), &plan(3))
            .await
            .unwrap();

        assert_eq!(tracker.count(Operation::CreateIssue), 4);
        assert_eq!(tracker.count(Operation::AddSubIssue), 3);
        assert_eq!(
            tracker.operations(),
            vec![
                Operation::CreateIssue,
                Operation::CreateIssue,
                Operation::AddSubIssue,
                Operation::CreateIssue,
                Operation::AddSubIssue,
                Operation::CreateIssue,
                Operation::AddSubIssue,
            ]
        );

        let issues = tracker.issues();
        assert_eq!(issues[0].1.title, "Agency onboarding: Monterey-Salinas Transit");
        assert_eq!(issues[0].1.labels, vec!["epic", "agency-onboarding"]);
        assert_eq!(issues[0].1.body, "Onboard Monterey-Salinas Transit");
        assert_eq!(issues[1].1.title, "MST: Task 0");
        assert_eq!(issues[1].1.labels, vec!["agency-onboarding"]);
        assert_eq!(issues[1].1.body, "Processor: Littlepay");
        assert_eq!(issues[2].1.body, "Eligibility for MST");

        for (parent, _) in tracker.sub_issues() {
            assert_eq!(parent, outcome.epic.node_id);
        }
        assert_eq!(outcome.issue_numbers().len(), 4);
        assert!(outcome.warnings().is_empty());
        assert!(outcome.initiative_link.is_none());
    }

    #[tokio::test]
    async fn link_failures_do_not_lose_children() {
        let tracker = InMemoryTracker::new();
        tracker.fail_on(Operation::AddSubIssue);
        let (_temp, renderer) = renderer();

        let outcome = create_epic(&tracker, &repo(), &renderer, &sample_agency(), &plan(2))
            .await
            .unwrap();

        assert_eq!(tracker.count(Operation::AddSubIssue), 2);
        assert_eq!(outcome.issue_numbers().len(), 3);
        assert_eq!(outcome.warnings().len(), 2);
        assert_eq!(outcome.failed_children(), 0);
    }

    #[tokio::test]
    async fn links_epic_under_initiative() {
        let tracker = InMemoryTracker::new();
        let initiative = tracker.seed_issue("Agency onboarding initiative");
        let (_temp, renderer) = renderer();
        let agency = sample_agency().with_initiative_issue(initiative.number);

        let outcome = create_epic(&tracker, &repo(), &renderer, &agency, &plan(2))
            .await
            .unwrap();

        assert_eq!(tracker.count(Operation::AddSubIssue), 3);
        assert_eq!(
            tracker.calls()[1],
            TrackerCall::GetIssue {
                number: initiative.number
            }
        );
        assert_eq!(
            tracker.sub_issues()[0],
            (initiative.node_id, outcome.epic.node_id.clone())
        );
        assert_eq!(outcome.initiative_link, Some(LinkOutcome::Linked));
    }

    #[tokio::test]
    async fn missing_initiative_is_a_warning() {
        let tracker = InMemoryTracker::new();
        let (_temp, renderer) = renderer();
        let agency = sample_agency().with_initiative_issue(999);

        let outcome = create_epic(&tracker, &repo(), &renderer, &agency, &plan(1))
            .await
            .unwrap();

        let warnings = outcome.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].parent, "#999");
        assert_eq!(tracker.count(Operation::AddSubIssue), 1);
    }

    #[tokio::test]
    async fn failed_child_does_not_stop_the_rest() {
        let tracker = InMemoryTracker::new();
        // Call 0 is the epic; call 2 is the second child.
        tracker.fail_nth(Operation::CreateIssue, 2);
        let (_temp, renderer) = renderer();

        let outcome = create_epic(&tracker, &repo(), &renderer, &sample_agency(), &plan(3))
            .await
            .unwrap();

        assert_eq!(tracker.count(Operation::CreateIssue), 4);
        assert_eq!(tracker.count(Operation::AddSubIssue), 2);
        assert_eq!(outcome.failed_children(), 1);
        assert!(matches!(outcome.children[1].result, ChildResult::Failed { .. }));
        assert_eq!(outcome.issue_numbers().len(), 3);
    }

    #[tokio::test]
    async fn missing_child_template_fails_only_that_child() {
        let tracker = InMemoryTracker::new();
        let (_temp, renderer) = renderer();
        let plan = EpicPlan::default().with_children(vec![
            ChildIssueDefinition::new("missing.md", "Missing"),
            ChildIssueDefinition::new("processor.md", "Processor"),
        ]);

        let outcome = create_epic(&tracker, &repo(), &renderer, &sample_agency(), &plan)
            .await
            .unwrap();

        assert_eq!(outcome.failed_children(), 1);
        assert_eq!(tracker.count(Operation::CreateIssue), 2);
        match &outcome.children[0].result {
            ChildResult::Failed { error } => assert!(error.contains("missing.md")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn epic_failure_is_fatal() {
        let tracker = InMemoryTracker::new();
        tracker.fail_on(Operation::CreateIssue);
        let (_temp, renderer) = renderer();

        let result = create_epic(&tracker, &repo(), &renderer, &sample_agency(), &plan(2)).await;

        assert!(matches!(result, Err(EpicError::Issue(_))));
        assert_eq!(tracker.count(Operation::CreateIssue), 1);
    }
}
