//! Publishing the updated adoption document.
//!
//! The change goes out as a single commit on a fresh branch cut from the base
//! branch, followed by a draft pull request. Steps run strictly in order and
//! the first failure stops the pipeline. A branch created before the failure
//! is left in place.

mod error;
mod status;

pub use error::{PublicationError, PublicationStep};
pub use status::AdoptionStatus;

use crate::agency::AgencyInput;
use crate::templates::{
    generate_branch_name, generate_commit_message, generate_pr_body, generate_pr_title,
};
use crate::tracker::{CreatedPullRequest, FileUpdate, NewPullRequest, RepoContext, Tracker};
use tracing::{debug, info, info_span, Instrument};

/// Everything needed to publish one document change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRequest {
    /// New document content.
    pub content: String,

    /// Path of the document in the repository.
    pub path: String,

    /// Branch the new branch is cut from and the PR targets.
    pub base_branch: String,

    /// Branch to create.
    pub branch: String,

    /// Commit message.
    pub commit_message: String,

    /// PR title.
    pub pr_title: String,

    /// PR body.
    pub pr_body: String,
}

impl PublicationRequest {
    /// Builds the request for adding an agency to the adoption table.
    ///
    /// The branch name, commit message and PR text are derived from the
    /// agency; the PR body references the epic.
    pub fn for_agency(
        agency: &AgencyInput,
        epic_number: u64,
        path: impl Into<String>,
        base_branch: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            path: path.into(),
            base_branch: base_branch.into(),
            branch: generate_branch_name(agency),
            commit_message: generate_commit_message(agency),
            pr_title: generate_pr_title(agency),
            pr_body: generate_pr_body(agency, epic_number),
        }
    }
}

/// A published change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedChange {
    /// Branch holding the commit.
    pub branch: String,

    /// The draft pull request.
    pub pull_request: CreatedPullRequest,
}

impl From<PublishedChange> for AdoptionStatus {
    fn from(change: PublishedChange) -> Self {
        Self::Published {
            number: change.pull_request.number,
            url: change.pull_request.url,
            branch: change.branch,
        }
    }
}

/// Commits the document on a new branch and opens a draft PR.
///
/// # Arguments
///
/// * `tracker` - Issue tracker
/// * `repo` - Repository receiving the change
/// * `request` - Content, branch and PR text
///
/// # Errors
///
/// Returns [`PublicationError`] naming the step that failed. Creating a
/// branch that already exists fails with
/// [`TrackerError::BranchAlreadyExists`](crate::tracker::TrackerError::BranchAlreadyExists).
pub async fn publish<T>(
    tracker: &T,
    repo: &RepoContext,
    request: &PublicationRequest,
) -> Result<PublishedChange, PublicationError>
where
    T: Tracker + ?Sized,
{
    let span = info_span!(
        "publish",
        repo = %repo,
        branch = %request.branch,
        path = %request.path
    );

    async {
        let head = tracker
            .get_branch_head(repo, &request.base_branch)
            .await
            .map_err(PublicationError::at(PublicationStep::ReadBaseHead))?;
        debug!(base = %request.base_branch, sha = %head, "Read base branch head");

        tracker
            .create_branch(repo, &request.branch, &head)
            .await
            .map_err(PublicationError::at(PublicationStep::CreateBranch))?;
        info!("Branch created");

        let current = tracker
            .get_file(repo, &request.path, &request.branch)
            .await
            .map_err(PublicationError::at(PublicationStep::ReadFile))?;

        tracker
            .update_file(
                repo,
                &FileUpdate {
                    path: request.path.clone(),
                    message: request.commit_message.clone(),
                    content: request.content.clone(),
                    sha: current.sha,
                    branch: request.branch.clone(),
                },
            )
            .await
            .map_err(PublicationError::at(PublicationStep::CommitFile))?;
        debug!("Document committed");

        let pull_request = tracker
            .create_pull_request(
                repo,
                &NewPullRequest {
                    title: request.pr_title.clone(),
                    head: request.branch.clone(),
                    base: request.base_branch.clone(),
                    body: request.pr_body.clone(),
                    draft: true,
                },
            )
            .await
            .map_err(PublicationError::at(PublicationStep::OpenPullRequest))?;
        info!(pr_number = pull_request.number, "Draft PR opened");

        Ok(PublishedChange {
            branch: request.branch.clone(),
            pull_request,
        })
    }
    .instrument(span)
    .await
}
