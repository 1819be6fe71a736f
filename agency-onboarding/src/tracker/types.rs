//! Request and response shapes exchanged with the issue tracker.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The repository every tracker call is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoContext {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoContext {
    /// Creates a repository context from its owner and name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Error returned when an `owner/name` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid repository '{0}', expected 'owner/name'")]
pub struct InvalidRepository(pub String);

impl FromStr for RepoContext {
    type Err = InvalidRepository;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(InvalidRepository(s.to_string())),
        }
    }
}

/// An issue to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,

    /// Labels applied at creation.
    pub labels: Vec<String>,

    /// Rendered issue body.
    pub body: String,
}

/// Identifiers of an issue that exists in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedIssue {
    /// Issue number, used for display and cross references.
    pub number: u64,

    /// Opaque GraphQL node id, used only for linking.
    pub node_id: String,
}

/// A file as stored on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Blob hash the tracker requires when updating the file.
    pub sha: String,

    /// Decoded file content.
    pub content: String,
}

/// A single-file commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    /// Path of the file inside the repository.
    pub path: String,

    /// Commit message.
    pub message: String,

    /// New file content (plain text, encoded by the adapter).
    pub content: String,

    /// Blob hash of the version being replaced.
    pub sha: String,

    /// Branch receiving the commit.
    pub branch: String,
}

/// A pull request to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// PR title.
    pub title: String,

    /// Branch with the changes.
    pub head: String,

    /// Branch the changes target.
    pub base: String,

    /// PR body.
    pub body: String,

    /// Whether the PR is opened as a draft.
    pub draft: bool,
}

/// A pull request that exists in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPullRequest {
    /// PR number.
    pub number: u64,

    /// PR URL.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo: RepoContext = "cal-itp/benefits".parse().unwrap();
        assert_eq!(repo, RepoContext::new("cal-itp", "benefits"));
        assert_eq!(repo.to_string(), "cal-itp/benefits");
    }

    #[test]
    fn rejects_malformed_repository() {
        assert!("benefits".parse::<RepoContext>().is_err());
        assert!("/benefits".parse::<RepoContext>().is_err());
        assert!("cal-itp/".parse::<RepoContext>().is_err());
        assert!("a/b/c".parse::<RepoContext>().is_err());
    }
}
