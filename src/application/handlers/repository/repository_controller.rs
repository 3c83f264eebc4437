//! RepositoryController - Owns the per-cycle working copy.
//!
//! `acquire` always starts from an empty destination and never leaves a
//! partial clone behind; `release` is idempotent.

use secrecy::{ExposeSecret, Secret};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::dependency::{LOCK_FILE_NAME, MANIFEST_FILE_NAME};
use crate::domain::foundation::ValidationError;
use crate::domain::publish::RepoCoordinates;
use crate::ports::{SourceControl, SourceControlError, StatusEntry};

/// Local clone used by exactly one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    path: PathBuf,
}

impl WorkingCopy {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path.join(LOCK_FILE_NAME)
    }
}

/// Failures while acquiring or releasing a working copy.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("invalid repository URL: {0}")]
    InvalidUrl(#[from] ValidationError),

    /// The destination could not be prepared or removed.
    #[error("working directory {path}: {message}")]
    Workspace { path: String, message: String },

    /// The clone itself failed (network, authentication, missing repository).
    #[error("clone failed")]
    Transport(#[source] SourceControlError),
}

impl CloneError {
    fn workspace(path: &Path, err: impl ToString) -> Self {
        Self::Workspace {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Handler for the working copy lifecycle.
pub struct RepositoryController {
    source_control: Arc<dyn SourceControl>,
}

impl RepositoryController {
    pub fn new(source_control: Arc<dyn SourceControl>) -> Self {
        Self { source_control }
    }

    /// Fresh, authenticated clone of `repo_url` at `destination`.
    ///
    /// Any previous occupant of `destination` is removed first. On failure
    /// `destination` does not exist afterwards.
    pub async fn acquire(
        &self,
        repo_url: &str,
        credential: &Secret<String>,
        destination: &Path,
    ) -> Result<WorkingCopy, CloneError> {
        remove_if_present(destination).await?;
        let coordinates = RepoCoordinates::parse(repo_url)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CloneError::workspace(parent, e))?;
            }
        }

        tracing::info!(
            repository = %coordinates,
            destination = %destination.display(),
            "Cloning repository"
        );

        let remote = Secret::new(coordinates.authenticated_url(credential.expose_secret()));
        if let Err(err) = self
            .source_control
            .clone_repository(&remote, destination)
            .await
        {
            if let Err(cleanup) = remove_if_present(destination).await {
                tracing::warn!(error = %cleanup, "Could not remove partial clone");
            }
            return Err(CloneError::Transport(err));
        }

        Ok(WorkingCopy::new(destination))
    }

    /// Removes the working copy. Succeeds if it is already gone.
    pub async fn release(&self, working_copy: &WorkingCopy) -> Result<(), CloneError> {
        remove_if_present(working_copy.path()).await?;
        tracing::debug!(path = %working_copy.path().display(), "Working copy released");
        Ok(())
    }

    /// Working tree status of the working copy.
    pub async fn status(
        &self,
        working_copy: &WorkingCopy,
    ) -> Result<Vec<StatusEntry>, SourceControlError> {
        self.source_control.status(working_copy.path()).await
    }
}

async fn remove_if_present(path: &Path) -> Result<(), CloneError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CloneError::workspace(path, e)),
    }
}
