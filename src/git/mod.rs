//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release performs, allowing for a real repository implementation and a
//! recording mock for testing.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation that records every call
//!
//! The release pipeline depends on the [Repository] trait only.

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use repository::Git2Repository;

use std::path::{Component, Path, PathBuf};

use crate::error::Result;

/// Git operations needed to record and publish a release.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::ReleaseError] variants. Committing with no staged change
/// is reported as [crate::error::ReleaseError::NothingToCommit].
pub trait Repository {
    /// Root of the working tree. Relative paths handed to the other methods
    /// are resolved against it.
    fn workdir(&self) -> &Path;

    /// Name of the branch HEAD points at.
    ///
    /// # Returns
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// Stage exactly the given paths (files or directories), including
    /// deletions below them. Nothing outside these paths is staged.
    fn stage_paths(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit the index on top of HEAD.
    ///
    /// # Returns
    /// * `Ok(String)` - The new commit hash
    /// * `Err(NothingToCommit)` - If the index matches HEAD's tree
    fn commit(&self, message: &str) -> Result<String>;

    /// Push the current branch to `remote`.
    fn push_branch(&self, remote: &str) -> Result<()>;

    /// Create an annotated tag at HEAD.
    ///
    /// # Returns
    /// * `Err` - If the tag already exists or HEAD has no commit
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push every local tag to `remote`.
    fn push_tags(&self, remote: &str) -> Result<()>;
}

/// Normalizes a configured path (e.g. `./scripts/generate_docs.sh`) into a
/// pathspec relative to the working tree root.
pub fn repo_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
