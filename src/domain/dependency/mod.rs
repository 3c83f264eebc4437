//! Dependency module - what the package manager reports and what changed.
//!
//! - `OutdatedPackage` - one entry of the outdated-check report
//! - `Manifest` - read-only view of the dependency declarations
//! - `UpgradeResult` - one version change derived from a manifest diff

mod manifest;
mod outdated_package;
mod upgrade_result;

pub use manifest::{Manifest, ManifestError, DependencySection, LOCK_FILE_NAME, MANIFEST_FILE_NAME};
pub use outdated_package::{parse_outdated_report, OutdatedPackage, OutdatedReportError};
pub use upgrade_result::{diff_manifests, UpgradeResult};
