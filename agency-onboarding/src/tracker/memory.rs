//! In-memory [`Tracker`] that records every call.
//!
//! Used by the test suites and for local experiments. Issues, branches, files
//! and pull requests live in a mutex-guarded state; individual operations can
//! be told to fail so partial-failure paths can be exercised.

use super::{
    CreatedIssue, CreatedPullRequest, FileContent, FileUpdate, NewIssue, NewPullRequest,
    RepoContext, Tracker, TrackerError, TrackerResult,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The kind of a tracker call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `create_issue`
    CreateIssue,
    /// `get_issue`
    GetIssue,
    /// `add_sub_issue`
    AddSubIssue,
    /// `get_branch_head`
    GetBranchHead,
    /// `create_branch`
    CreateBranch,
    /// `get_file`
    GetFile,
    /// `update_file`
    UpdateFile,
    /// `create_pull_request`
    CreatePullRequest,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::CreateIssue => "create issue",
            Self::GetIssue => "get issue",
            Self::AddSubIssue => "addSubIssue",
            Self::GetBranchHead => "get ref",
            Self::CreateBranch => "create ref",
            Self::GetFile => "get content",
            Self::UpdateFile => "update content",
            Self::CreatePullRequest => "create pull request",
        }
    }
}

/// A recorded tracker call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    /// An issue creation.
    CreateIssue(NewIssue),
    /// An issue lookup.
    GetIssue { number: u64 },
    /// A sub-issue link.
    AddSubIssue { parent: String, child: String },
    /// A branch head lookup.
    GetBranchHead { branch: String },
    /// A branch creation.
    CreateBranch { branch: String, sha: String },
    /// A file read.
    GetFile { path: String, reference: String },
    /// A file commit.
    UpdateFile(FileUpdate),
    /// A pull request creation.
    CreatePullRequest(NewPullRequest),
}

impl TrackerCall {
    /// Returns the kind of this call.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::CreateIssue(_) => Operation::CreateIssue,
            Self::GetIssue { .. } => Operation::GetIssue,
            Self::AddSubIssue { .. } => Operation::AddSubIssue,
            Self::GetBranchHead { .. } => Operation::GetBranchHead,
            Self::CreateBranch { .. } => Operation::CreateBranch,
            Self::GetFile { .. } => Operation::GetFile,
            Self::UpdateFile(_) => Operation::UpdateFile,
            Self::CreatePullRequest(_) => Operation::CreatePullRequest,
        }
    }
}

/// Which calls of an operation should fail.
#[derive(Debug, Clone)]
enum Failure {
    Always,
    Nth(HashSet<usize>),
}

#[derive(Debug)]
struct StoredFile {
    content: String,
    sha: String,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<TrackerCall>,
    issues: Vec<(CreatedIssue, NewIssue)>,
    sub_issues: Vec<(String, String)>,
    branches: HashMap<String, String>,
    files: HashMap<String, StoredFile>,
    pull_requests: Vec<(CreatedPullRequest, NewPullRequest)>,
    failures: HashMap<Operation, Failure>,
    attempts: HashMap<Operation, usize>,
    next_number: u64,
    next_sha: u64,
}

impl State {
    fn record(&mut self, call: TrackerCall) -> TrackerResult<()> {
        let operation = call.operation();
        self.calls.push(call);

        let attempt = self.attempts.entry(operation).or_insert(0);
        let index = *attempt;
        *attempt += 1;

        let fails = match self.failures.get(&operation) {
            Some(Failure::Always) => true,
            Some(Failure::Nth(indices)) => indices.contains(&index),
            None => false,
        };

        if fails {
            Err(injected_failure(operation))
        } else {
            Ok(())
        }
    }

    fn next_sha(&mut self) -> String {
        self.next_sha += 1;
        format!("{:040x}", self.next_sha)
    }
}

fn injected_failure(operation: Operation) -> TrackerError {
    match operation {
        Operation::AddSubIssue => TrackerError::GraphQlError {
            message: "injected failure".to_string(),
        },
        _ => TrackerError::UnexpectedResponse {
            operation: operation.name(),
            message: "injected failure".to_string(),
        },
    }
}

/// A [`Tracker`] holding all state in memory.
#[derive(Debug)]
pub struct InMemoryTracker {
    state: Mutex<State>,
}

impl Default for InMemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTracker {
    /// Creates an empty tracker with a `main` branch.
    #[must_use]
    pub fn new() -> Self {
        let mut state = State {
            next_number: 1,
            ..State::default()
        };
        let head = state.next_sha();
        state.branches.insert("main".to_string(), head);
        Self {
            state: Mutex::new(state),
        }
    }

    /// Adds a file to the repository.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        {
            let mut state = self.lock();
            let sha = state.next_sha();
            state.files.insert(
                path.into(),
                StoredFile {
                    content: content.into(),
                    sha,
                },
            );
        }
        self
    }

    /// Adds an existing issue, returning its identifiers.
    pub fn seed_issue(&self, title: impl Into<String>) -> CreatedIssue {
        let mut state = self.lock();
        let created = CreatedIssue {
            number: state.next_number,
            node_id: format!("I_{}", state.next_number),
        };
        state.next_number += 1;
        state.issues.push((
            created.clone(),
            NewIssue {
                title: title.into(),
                labels: Vec::new(),
                body: String::new(),
            },
        ));
        created
    }

    /// Adds a branch pointing at the current `main` head.
    pub fn seed_branch(&self, branch: impl Into<String>) {
        let mut state = self.lock();
        let head = state.branches.get("main").cloned().unwrap_or_default();
        state.branches.insert(branch.into(), head);
    }

    /// Makes every call of `operation` fail.
    pub fn fail_on(&self, operation: Operation) {
        self.lock().failures.insert(operation, Failure::Always);
    }

    /// Makes the `index`-th (zero based) call of `operation` fail.
    pub fn fail_nth(&self, operation: Operation, index: usize) {
        let mut state = self.lock();
        match state
            .failures
            .entry(operation)
            .or_insert_with(|| Failure::Nth(HashSet::new()))
        {
            Failure::Nth(indices) => {
                indices.insert(index);
            }
            Failure::Always => {}
        }
    }

    /// Returns every recorded call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.lock().calls.clone()
    }

    /// Returns the kinds of every recorded call in order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().calls.iter().map(TrackerCall::operation).collect()
    }

    /// Counts the recorded calls of one kind.
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Returns the issues that exist, in creation order.
    #[must_use]
    pub fn issues(&self) -> Vec<(CreatedIssue, NewIssue)> {
        self.lock().issues.clone()
    }

    /// Returns the recorded `(parent, child)` node id pairs.
    #[must_use]
    pub fn sub_issues(&self) -> Vec<(String, String)> {
        self.lock().sub_issues.clone()
    }

    /// Returns the current content of a file.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<String> {
        self.lock().files.get(path).map(|f| f.content.clone())
    }

    /// Returns whether a branch exists.
    #[must_use]
    pub fn has_branch(&self, branch: &str) -> bool {
        self.lock().branches.contains_key(branch)
    }

    /// Returns the pull requests that were opened.
    #[must_use]
    pub fn pull_requests(&self) -> Vec<NewPullRequest> {
        self.lock()
            .pull_requests
            .iter()
            .map(|(_, pr)| pr.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Tracker for InMemoryTracker {
    async fn create_issue(
        &self,
        _repo: &RepoContext,
        issue: &NewIssue,
    ) -> TrackerResult<CreatedIssue> {
        let mut state = self.lock();
        state.record(TrackerCall::CreateIssue(issue.clone()))?;

        let created = CreatedIssue {
            number: state.next_number,
            node_id: format!("I_{}", state.next_number),
        };
        state.next_number += 1;
        state.issues.push((created.clone(), issue.clone()));
        Ok(created)
    }

    async fn get_issue(&self, _repo: &RepoContext, number: u64) -> TrackerResult<CreatedIssue> {
        let mut state = self.lock();
        state.record(TrackerCall::GetIssue { number })?;

        state
            .issues
            .iter()
            .find(|(issue, _)| issue.number == number)
            .map(|(issue, _)| issue.clone())
            .ok_or_else(|| TrackerError::UnexpectedResponse {
                operation: Operation::GetIssue.name(),
                message: format!("issue #{number} not found"),
            })
    }

    async fn add_sub_issue(
        &self,
        parent_node_id: &str,
        child_node_id: &str,
    ) -> TrackerResult<String> {
        let mut state = self.lock();
        state.record(TrackerCall::AddSubIssue {
            parent: parent_node_id.to_string(),
            child: child_node_id.to_string(),
        })?;

        state
            .sub_issues
            .push((parent_node_id.to_string(), child_node_id.to_string()));
        Ok(parent_node_id.to_string())
    }

    async fn get_branch_head(&self, _repo: &RepoContext, branch: &str) -> TrackerResult<String> {
        let mut state = self.lock();
        state.record(TrackerCall::GetBranchHead {
            branch: branch.to_string(),
        })?;

        state
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| TrackerError::UnexpectedResponse {
                operation: Operation::GetBranchHead.name(),
                message: format!("branch '{branch}' not found"),
            })
    }

    async fn create_branch(
        &self,
        _repo: &RepoContext,
        branch: &str,
        sha: &str,
    ) -> TrackerResult<()> {
        let mut state = self.lock();
        state.record(TrackerCall::CreateBranch {
            branch: branch.to_string(),
            sha: sha.to_string(),
        })?;

        if state.branches.contains_key(branch) {
            return Err(TrackerError::BranchAlreadyExists {
                branch: branch.to_string(),
            });
        }
        state.branches.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn get_file(
        &self,
        _repo: &RepoContext,
        path: &str,
        reference: &str,
    ) -> TrackerResult<FileContent> {
        let mut state = self.lock();
        state.record(TrackerCall::GetFile {
            path: path.to_string(),
            reference: reference.to_string(),
        })?;

        if !state.branches.contains_key(reference) {
            return Err(TrackerError::UnexpectedResponse {
                operation: Operation::GetFile.name(),
                message: format!("ref '{reference}' not found"),
            });
        }

        state
            .files
            .get(path)
            .map(|f| FileContent {
                sha: f.sha.clone(),
                content: f.content.clone(),
            })
            .ok_or_else(|| TrackerError::UnexpectedResponse {
                operation: Operation::GetFile.name(),
                message: format!("'{path}' not found on '{reference}'"),
            })
    }

    async fn update_file(&self, _repo: &RepoContext, update: &FileUpdate) -> TrackerResult<()> {
        let mut state = self.lock();
        state.record(TrackerCall::UpdateFile(update.clone()))?;

        let current = state.files.get(&update.path).map(|f| f.sha.clone());
        if current.as_deref() != Some(update.sha.as_str()) {
            return Err(TrackerError::UnexpectedResponse {
                operation: Operation::UpdateFile.name(),
                message: format!("{} does not match {}", update.path, update.sha),
            });
        }

        let sha = state.next_sha();
        let commit = state.next_sha();
        state.files.insert(
            update.path.clone(),
            StoredFile {
                content: update.content.clone(),
                sha,
            },
        );
        state.branches.insert(update.branch.clone(), commit);
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepoContext,
        pull_request: &NewPullRequest,
    ) -> TrackerResult<CreatedPullRequest> {
        let mut state = self.lock();
        state.record(TrackerCall::CreatePullRequest(pull_request.clone()))?;

        let number = state.next_number;
        state.next_number += 1;
        let created = CreatedPullRequest {
            number,
            url: format!("https://github.com/{repo}/pull/{number}"),
        };
        state
            .pull_requests
            .push((created.clone(), pull_request.clone()));
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoContext {
        RepoContext::new("cal-itp", "benefits")
    }

    fn issue(title: &str) -> NewIssue {
        NewIssue {
            title: title.to_string(),
            labels: vec!["agency-onboarding".to_string()],
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn numbers_issues_sequentially() {
        let tracker = InMemoryTracker::new();

        let first = tracker.create_issue(&repo(), &issue("one")).await.unwrap();
        let second = tracker.create_issue(&repo(), &issue("two")).await.unwrap();

        assert_eq!(first.number + 1, second.number);
        assert_ne!(first.node_id, second.node_id);
        assert_eq!(tracker.get_issue(&repo(), second.number).await.unwrap(), second);
    }

    #[tokio::test]
    async fn fails_only_the_requested_call() {
        let tracker = InMemoryTracker::new();
        tracker.fail_nth(Operation::CreateIssue, 1);

        assert!(tracker.create_issue(&repo(), &issue("one")).await.is_ok());
        assert!(tracker.create_issue(&repo(), &issue("two")).await.is_err());
        assert!(tracker.create_issue(&repo(), &issue("three")).await.is_ok());

        assert_eq!(tracker.count(Operation::CreateIssue), 3);
        assert_eq!(tracker.issues().len(), 2);
    }

    #[tokio::test]
    async fn rejects_existing_branch() {
        let tracker = InMemoryTracker::new();
        tracker.seed_branch("docs/update");

        let result = tracker.create_branch(&repo(), "docs/update", "abc").await;
        assert!(matches!(
            result,
            Err(TrackerError::BranchAlreadyExists { branch }) if branch == "docs/update"
        ));
    }

    #[tokio::test]
    async fn update_requires_current_sha() {
        let tracker = InMemoryTracker::new().with_file("docs/index.md", "old");
        let current = tracker.get_file(&repo(), "docs/index.md", "main").await.unwrap();

        let stale = FileUpdate {
            path: "docs/index.md".to_string(),
            message: "update".to_string(),
            content: "new".to_string(),
            sha: "stale".to_string(),
            branch: "main".to_string(),
        };
        assert!(tracker.update_file(&repo(), &stale).await.is_err());

        let fresh = FileUpdate {
            sha: current.sha,
            ..stale
        };
        tracker.update_file(&repo(), &fresh).await.unwrap();
        assert_eq!(tracker.file("docs/index.md").as_deref(), Some("new"));
    }
}
