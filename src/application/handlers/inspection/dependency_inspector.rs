//! DependencyInspector - Enumerates outdated dependencies.
//!
//! Reads only; the manifest is never modified by a scan.

use std::sync::Arc;
use thiserror::Error;

use crate::application::handlers::repository::WorkingCopy;
use crate::domain::dependency::{parse_outdated_report, OutdatedPackage, OutdatedReportError};
use crate::ports::{PackageManager, PackageManagerError};

/// Failures while scanning for outdated dependencies.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The working copy has no manifest to inspect.
    #[error("no manifest found at {path}")]
    ManifestMissing { path: String },

    #[error("outdated check failed")]
    Report(#[from] PackageManagerError),

    #[error("malformed outdated report")]
    Malformed(#[from] OutdatedReportError),

    #[error("could not read working copy: {0}")]
    Io(String),
}

/// Handler for dependency inspection.
pub struct DependencyInspector {
    package_manager: Arc<dyn PackageManager>,
}

impl DependencyInspector {
    pub fn new(package_manager: Arc<dyn PackageManager>) -> Self {
        Self { package_manager }
    }

    /// Installs the declared tree so the outdated check sees real versions.
    pub async fn prepare(&self, working_copy: &WorkingCopy) -> Result<(), PackageManagerError> {
        self.package_manager.install(working_copy.path()).await
    }

    /// Outdated packages in name order; empty when everything is current.
    pub async fn scan(&self, working_copy: &WorkingCopy) -> Result<Vec<OutdatedPackage>, ScanError> {
        let manifest = working_copy.manifest_path();
        let present = tokio::fs::try_exists(&manifest)
            .await
            .map_err(|e| ScanError::Io(e.to_string()))?;
        if !present {
            return Err(ScanError::ManifestMissing {
                path: manifest.display().to_string(),
            });
        }

        let report = self
            .package_manager
            .outdated_report(working_copy.path())
            .await?;
        let outdated = parse_outdated_report(&report)?;

        if outdated.is_empty() {
            tracing::info!("All dependencies are up to date");
        } else {
            for package in &outdated {
                tracing::info!(
                    package = %package.name,
                    current = %package.current_version,
                    latest = %package.latest_version,
                    "Outdated dependency"
                );
            }
        }

        Ok(outdated)
    }
}
