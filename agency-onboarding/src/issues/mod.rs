//! GitHub issue creation and sub-issue linking.
//!
//! Creating an issue is the durable effect and its failure is reported to the
//! caller. Linking is best-effort: a failed link is logged and returned as a
//! [`LinkOutcome::Failed`] value, never as an error.

mod error;
mod link;

pub use error::IssueError;
pub use link::{LinkOutcome, LinkWarning};

use crate::tracker::{CreatedIssue, NewIssue, RepoContext, Tracker};
use tracing::{debug, info, info_span, warn, Instrument};

/// Creates a single issue.
///
/// # Arguments
///
/// * `tracker` - Issue tracker
/// * `repo` - Target repository
/// * `issue` - Title, labels and rendered body
///
/// # Errors
///
/// Returns [`IssueError::EmptyLabels`] without calling the tracker when the
/// label set is empty, or [`IssueError::Tracker`] if the tracker rejects the
/// request. The call is not retried.
pub async fn create_issue<T>(
    tracker: &T,
    repo: &RepoContext,
    issue: &NewIssue,
) -> Result<CreatedIssue, IssueError>
where
    T: Tracker + ?Sized,
{
    let span = info_span!("create_issue", repo = %repo, title = %issue.title);

    async {
        if issue.labels.is_empty() {
            return Err(IssueError::EmptyLabels {
                title: issue.title.clone(),
            });
        }

        let created = tracker.create_issue(repo, issue).await?;
        info!(issue_number = created.number, "Issue created");
        Ok(created)
    }
    .instrument(span)
    .await
}

/// Records `child_node_id` as a sub-issue of `parent_node_id`.
///
/// Never fails: a rejected link is logged at warn level and returned as
/// [`LinkOutcome::Failed`].
pub async fn link_sub_issue<T>(tracker: &T, parent_node_id: &str, child_node_id: &str) -> LinkOutcome
where
    T: Tracker + ?Sized,
{
    debug!(parent = parent_node_id, child = child_node_id, "Linking sub-issue");

    match tracker.add_sub_issue(parent_node_id, child_node_id).await {
        Ok(_) => LinkOutcome::Linked,
        Err(e) => {
            warn!(
                parent = parent_node_id,
                child = child_node_id,
                error = %e,
                "Failed to link sub-issue via GraphQL"
            );
            LinkOutcome::Failed(LinkWarning {
                parent: parent_node_id.to_string(),
                child: child_node_id.to_string(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{InMemoryTracker, Operation};

    fn repo() -> RepoContext {
        RepoContext::new("cal-itp", "benefits")
    }

    fn issue(labels: &[&str]) -> NewIssue {
        NewIssue {
            title: "MST: Configure transit processor".to_string(),
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_issue_with_labels() {
        let tracker = InMemoryTracker::new();

        let created = create_issue(&tracker, &repo(), &issue(&["agency-onboarding"]))
            .await
            .unwrap();

        let issues = tracker.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, created);
        assert_eq!(issues[0].1.labels, vec!["agency-onboarding".to_string()]);
    }

    #[tokio::test]
    async fn empty_label_set_makes_no_call() {
        let tracker = InMemoryTracker::new();

        let result = create_issue(&tracker, &repo(), &issue(&[])).await;

        assert!(matches!(result, Err(IssueError::EmptyLabels { .. })));
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn tracker_rejection_is_an_error() {
        let tracker = InMemoryTracker::new();
        tracker.fail_on(Operation::CreateIssue);

        let result = create_issue(&tracker, &repo(), &issue(&["epic"])).await;
        assert!(matches!(result, Err(IssueError::Tracker(_))));
    }

    #[tokio::test]
    async fn link_records_relation() {
        let tracker = InMemoryTracker::new();

        let outcome = link_sub_issue(&tracker, "I_parent", "I_child").await;

        assert!(outcome.is_linked());
        assert_eq!(
            tracker.sub_issues(),
            vec![("I_parent".to_string(), "I_child".to_string())]
        );
    }

    #[tokio::test]
    async fn link_failure_becomes_warning() {
        let tracker = InMemoryTracker::new();
        tracker.fail_on(Operation::AddSubIssue);

        let outcome = link_sub_issue(&tracker, "I_parent", "I_child").await;

        let warning = outcome.warning().unwrap();
        assert_eq!(warning.parent, "I_parent");
        assert_eq!(warning.child, "I_child");
        assert!(warning.message.contains("injected failure"));
    }
}
