//! Package Manager Port - Dependency installation and inspection.
//!
//! Implementations run inside a project directory containing the manifest.
//! `NpmCli` is the production implementation.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Port for package manager operations.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Install the dependency tree as declared.
    ///
    /// Also used as the reconciling pass after individual upgrades.
    async fn install(&self, project: &Path) -> Result<(), PackageManagerError>;

    /// Raw machine-readable outdated report.
    ///
    /// A report listing outdated packages is a successful call even when the
    /// tool signals it through its exit status.
    async fn outdated_report(&self, project: &Path) -> Result<String, PackageManagerError>;

    /// Upgrade a single package to its latest release, saving the new
    /// version into the manifest.
    async fn install_latest(&self, project: &Path, package: &str)
        -> Result<(), PackageManagerError>;

    /// Post-install sanity check of the installed tree.
    async fn verify(&self, project: &Path) -> Result<(), PackageManagerError>;
}

/// Errors from package manager operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageManagerError {
    /// The operation ran and reported failure.
    #[error("{command} failed with exit code {code:?}: {diagnostics}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("could not run {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("{command} timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    /// The installed tree is broken beyond tolerated complaints.
    #[error("dependency tree verification failed: {0}")]
    VerificationFailed(String),
}

impl PackageManagerError {
    pub fn command_failed(
        command: impl Into<String>,
        code: Option<i32>,
        diagnostics: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            diagnostics: diagnostics.into(),
        }
    }
}
