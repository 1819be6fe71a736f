//! GitHub adapter for the [`Tracker`] port.

use super::{
    CreatedIssue, CreatedPullRequest, FileContent, FileUpdate, NewIssue, NewPullRequest,
    RepoContext, Tracker, TrackerError, TrackerResult,
};
use async_trait::async_trait;
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use octocrab::Octocrab;
use serde_json::{json, Value};
use tracing::debug;

/// GraphQL mutation recording a parent/child issue relation.
const ADD_SUB_ISSUE_MUTATION: &str = r"mutation AddSubIssue($issueId: ID!, $subIssueId: ID!) {
  addSubIssue(input: { issueId: $issueId, subIssueId: $subIssueId }) {
    issue {
      id
    }
  }
}";

/// [`Tracker`] backed by the GitHub REST and GraphQL APIs.
#[derive(Debug, Clone)]
pub struct OctocrabTracker {
    octocrab: Octocrab,
}

impl OctocrabTracker {
    /// Wraps an authenticated GitHub client.
    #[must_use]
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::GitHubError`] if the client cannot be built.
    pub fn with_token(token: impl Into<String>) -> TrackerResult<Self> {
        let octocrab = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl Tracker for OctocrabTracker {
    async fn create_issue(
        &self,
        repo: &RepoContext,
        issue: &NewIssue,
    ) -> TrackerResult<CreatedIssue> {
        let created = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone())
            .send()
            .await?;

        Ok(CreatedIssue {
            number: created.number,
            node_id: created.node_id,
        })
    }

    async fn get_issue(&self, repo: &RepoContext, number: u64) -> TrackerResult<CreatedIssue> {
        let issue = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .get(number)
            .await?;

        Ok(CreatedIssue {
            number: issue.number,
            node_id: issue.node_id,
        })
    }

    async fn add_sub_issue(
        &self,
        parent_node_id: &str,
        child_node_id: &str,
    ) -> TrackerResult<String> {
        let payload = json!({
            "query": ADD_SUB_ISSUE_MUTATION,
            "variables": {
                "issueId": parent_node_id,
                "subIssueId": child_node_id,
            },
        });

        let response: Value = self.octocrab.graphql(&payload).await?;
        parse_add_sub_issue_response(&response)
    }

    async fn get_branch_head(&self, repo: &RepoContext, branch: &str) -> TrackerResult<String> {
        let reference = self
            .octocrab
            .repos(&repo.owner, &repo.name)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await?;

        match reference.object {
            Object::Commit { sha, .. } | Object::Tag { sha, .. } => Ok(sha),
            _ => Err(TrackerError::UnexpectedResponse {
                operation: "get ref",
                message: format!("'{branch}' does not point at a commit"),
            }),
        }
    }

    async fn create_branch(
        &self,
        repo: &RepoContext,
        branch: &str,
        sha: &str,
    ) -> TrackerResult<()> {
        debug!(branch, sha, "Creating branch");
        self.octocrab
            .repos(&repo.owner, &repo.name)
            .create_ref(&Reference::Branch(branch.to_string()), sha)
            .await
            .map_err(|e| branch_error(e.into(), branch))?;
        Ok(())
    }

    async fn get_file(
        &self,
        repo: &RepoContext,
        path: &str,
        reference: &str,
    ) -> TrackerResult<FileContent> {
        let items = self
            .octocrab
            .repos(&repo.owner, &repo.name)
            .get_content()
            .path(path)
            .r#ref(reference)
            .send()
            .await?;

        let file = items
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::UnexpectedResponse {
                operation: "get content",
                message: format!("'{path}' not found on '{reference}'"),
            })?;

        let content = file
            .decoded_content()
            .ok_or_else(|| TrackerError::UnexpectedResponse {
                operation: "get content",
                message: format!("'{path}' is not a decodable file"),
            })?;

        Ok(FileContent {
            sha: file.sha,
            content,
        })
    }

    async fn update_file(&self, repo: &RepoContext, update: &FileUpdate) -> TrackerResult<()> {
        // The client base64-encodes the content.
        self.octocrab
            .repos(&repo.owner, &repo.name)
            .update_file(&update.path, &update.message, &update.content, &update.sha)
            .branch(&update.branch)
            .send()
            .await?;
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepoContext,
        pull_request: &NewPullRequest,
    ) -> TrackerResult<CreatedPullRequest> {
        let pr = self
            .octocrab
            .pulls(&repo.owner, &repo.name)
            .create(&pull_request.title, &pull_request.head, &pull_request.base)
            .body(&pull_request.body)
            .draft(pull_request.draft)
            .send()
            .await?;

        let url = pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("https://github.com/{repo}/pull/{}", pr.number));

        Ok(CreatedPullRequest {
            number: pr.number,
            url,
        })
    }
}

/// Extracts the parent id from an `addSubIssue` response.
///
/// GraphQL failures arrive as a successful HTTP response carrying `errors`.
fn parse_add_sub_issue_response(response: &Value) -> TrackerResult<String> {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TrackerError::GraphQlError { message });
        }
    }

    response
        .pointer("/data/addSubIssue/issue/id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TrackerError::UnexpectedResponse {
            operation: "addSubIssue",
            message: "response is missing the parent issue id".to_string(),
        })
}

/// GitHub answers a `create ref` for an existing branch with 422 "Reference already exists".
fn branch_error(error: TrackerError, branch: &str) -> TrackerError {
    if error.is_already_exists() {
        TrackerError::BranchAlreadyExists {
            branch: branch.to_string(),
        }
    } else {
        error
    }
}
