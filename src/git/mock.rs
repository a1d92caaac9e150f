use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::git::{repo_relative, Repository};

/// A git operation recorded by [MockRepository].
#[derive(Debug, Clone, PartialEq)]
pub enum GitCall {
    Stage(Vec<PathBuf>),
    Commit(String),
    PushBranch(String),
    Tag { name: String, message: String },
    PushTags(String),
}

impl GitCall {
    /// Operation name used to select failures with [MockRepository::fail_on].
    pub fn operation(&self) -> &'static str {
        match self {
            GitCall::Stage(_) => "stage",
            GitCall::Commit(_) => "commit",
            GitCall::PushBranch(_) => "push_branch",
            GitCall::Tag { .. } => "tag",
            GitCall::PushTags(_) => "push_tags",
        }
    }
}

/// Mock repository for testing without actual git operations
///
/// Every call is recorded in order, including calls configured to fail.
pub struct MockRepository {
    workdir: PathBuf,
    branch: String,
    calls: RefCell<Vec<GitCall>>,
    failing: HashSet<&'static str>,
}

impl MockRepository {
    /// Create a mock rooted at `workdir` on branch `main`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branch: "main".to_string(),
            calls: RefCell::new(Vec::new()),
            failing: HashSet::new(),
        }
    }

    /// Make every call of the named operation fail
    pub fn fail_on(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: GitCall) -> Result<()> {
        let operation = call.operation();
        self.calls.borrow_mut().push(call);
        if self.failing.contains(operation) {
            Err(ReleaseError::remote(format!("mock {} failure", operation)))
        } else {
            Ok(())
        }
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn stage_paths(&self, paths: &[PathBuf]) -> Result<()> {
        self.record(GitCall::Stage(
            paths.iter().map(|p| repo_relative(p)).collect(),
        ))
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.record(GitCall::Commit(message.to_string()))?;
        Ok(format!("{:040x}", self.calls.borrow().len()))
    }

    fn push_branch(&self, remote: &str) -> Result<()> {
        self.record(GitCall::PushBranch(remote.to_string()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        })
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        self.record(GitCall::PushTags(remote.to_string()))
    }
}
