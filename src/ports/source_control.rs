//! Source Control Port - Version control operations on a working copy.
//!
//! The application layer never shells out itself; it drives the repository
//! through this contract. `GitCli` is the production implementation.

use async_trait::async_trait;
use secrecy::Secret;
use std::path::Path;
use thiserror::Error;

/// Port for version control operations.
///
/// # Contract
///
/// - Every call blocks until the underlying operation finishes or times out.
/// - Remote URLs may embed a credential; implementations must not log them
///   in clear text.
/// - Failures carry the diagnostic output of the operation.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Clone `remote` into `destination`, which must not exist yet.
    async fn clone_repository(
        &self,
        remote: &Secret<String>,
        destination: &Path,
    ) -> Result<(), SourceControlError>;

    /// Name of the branch currently checked out.
    async fn current_branch(&self, repo: &Path) -> Result<String, SourceControlError>;

    /// Working tree status, one entry per changed path.
    async fn status(&self, repo: &Path) -> Result<Vec<StatusEntry>, SourceControlError>;

    /// Create `branch` and switch to it.
    async fn create_branch(&self, repo: &Path, branch: &str) -> Result<(), SourceControlError>;

    /// Stage exactly `paths`, relative to the repository root.
    async fn stage(&self, repo: &Path, paths: &[&str]) -> Result<(), SourceControlError>;

    /// Set the commit identity for this working copy only.
    async fn configure_identity(
        &self,
        repo: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), SourceControlError>;

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), SourceControlError>;

    /// Push `branch` to `remote`, creating it upstream.
    async fn push(
        &self,
        repo: &Path,
        remote: &Secret<String>,
        branch: &str,
    ) -> Result<(), SourceControlError>;
}

/// One line of a porcelain status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Index (staged) state code, `' '` when unchanged.
    pub index: char,
    /// Working tree state code, `' '` when unchanged.
    pub worktree: char,
    pub path: String,
}

impl StatusEntry {
    /// Parses one `XY path` porcelain line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let index = chars.next()?;
        let worktree = chars.next()?;
        let path = line.get(3..)?.trim();
        if path.is_empty() {
            return None;
        }
        Some(Self {
            index,
            worktree,
            path: path.to_string(),
        })
    }

    /// Whether this entry has changes in the index.
    pub fn is_staged(&self) -> bool {
        self.index != ' ' && self.index != '?' && self.index != '!'
    }
}

/// Errors from version control operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceControlError {
    /// The operation ran and reported failure.
    #[error("{command} failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool could not be started at all.
    #[error("could not run {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("{command} timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    /// The tool's output could not be interpreted.
    #[error("unexpected output from {command}: {detail}")]
    UnexpectedOutput { command: String, detail: String },
}

impl SourceControlError {
    pub fn command_failed(
        command: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }
}
