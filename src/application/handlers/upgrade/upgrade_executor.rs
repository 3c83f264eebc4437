//! UpgradeExecutor - Applies upgrades package by package.
//!
//! The step is all-or-nothing: any failure restores the manifest and lock
//! file from the backup taken before the first mutation.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::ManifestBackup;
use crate::application::handlers::repository::WorkingCopy;
use crate::domain::dependency::{diff_manifests, Manifest, ManifestError, OutdatedPackage, UpgradeResult};
use crate::ports::{PackageManager, PackageManagerError};

/// Failures of the upgrade step.
#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("could not back up or restore {path}: {message}")]
    Backup { path: String, message: String },

    #[error("restored manifest does not match backup digest {expected}")]
    RestoreMismatch { expected: String },

    #[error("unreadable manifest")]
    Manifest(#[from] ManifestError),

    #[error("upgrade of {package} failed")]
    PackageFailed {
        package: String,
        #[source]
        source: PackageManagerError,
    },

    #[error("reconciling install failed")]
    Reconcile(#[source] PackageManagerError),

    #[error("verification failed")]
    Verification(#[source] PackageManagerError),

    /// The package manager ran but no declared version changed.
    #[error("upgrade produced no manifest changes")]
    NoChanges,

    /// Restoring after a failure failed too; the working copy is suspect.
    #[error("{original}; restoring the manifest also failed: {restore}")]
    RestoreFailed {
        #[source]
        original: Box<UpgradeError>,
        restore: String,
    },
}

impl UpgradeError {
    pub(super) fn backup(path: &Path, err: impl ToString) -> Self {
        Self::Backup {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Handler for the upgrade step.
pub struct UpgradeExecutor {
    package_manager: Arc<dyn PackageManager>,
}

impl UpgradeExecutor {
    pub fn new(package_manager: Arc<dyn PackageManager>) -> Self {
        Self { package_manager }
    }

    /// Upgrades `packages` in input order and reports what changed.
    ///
    /// On success the manifest holds exactly the returned new versions. On
    /// failure the manifest is byte-identical to its state before the call.
    pub async fn upgrade(
        &self,
        working_copy: &WorkingCopy,
        packages: &[OutdatedPackage],
    ) -> Result<Vec<UpgradeResult>, UpgradeError> {
        let backup = ManifestBackup::snapshot(working_copy.path()).await?;
        tracing::debug!(digest = %backup.digest_hex(), "Manifest backed up");

        match self.apply(working_copy, &backup, packages).await {
            Ok(results) => {
                for result in &results {
                    tracing::info!(
                        package = %result.package,
                        old = %result.old_version,
                        new = %result.new_version,
                        "Upgraded dependency"
                    );
                }
                Ok(results)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Upgrade step failed, restoring manifest");
                match backup.restore().await {
                    Ok(()) => Err(err),
                    Err(restore) => Err(UpgradeError::RestoreFailed {
                        original: Box::new(err),
                        restore: restore.to_string(),
                    }),
                }
            }
        }
    }

    async fn apply(
        &self,
        working_copy: &WorkingCopy,
        backup: &ManifestBackup,
        packages: &[OutdatedPackage],
    ) -> Result<Vec<UpgradeResult>, UpgradeError> {
        let project = working_copy.path();
        let before = Manifest::parse(backup.manifest_bytes())?;

        for package in packages {
            tracing::info!(package = %package.name, latest = %package.latest_version, "Upgrading");
            self.package_manager
                .install_latest(project, &package.name)
                .await
                .map_err(|source| UpgradeError::PackageFailed {
                    package: package.name.clone(),
                    source,
                })?;
        }

        self.package_manager
            .install(project)
            .await
            .map_err(UpgradeError::Reconcile)?;

        self.package_manager
            .verify(project)
            .await
            .map_err(UpgradeError::Verification)?;

        let manifest_path = working_copy.manifest_path();
        let after_bytes = tokio::fs::read(&manifest_path)
            .await
            .map_err(|e| UpgradeError::backup(&manifest_path, e))?;
        let after = Manifest::parse(&after_bytes)?;

        let results = diff_manifests(&before, &after);
        if results.is_empty() {
            return Err(UpgradeError::NoChanges);
        }
        Ok(results)
    }
}
