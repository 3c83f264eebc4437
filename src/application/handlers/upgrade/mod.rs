//! Upgrade handlers - mutate the manifest, or leave it untouched.

mod manifest_backup;
mod upgrade_executor;

pub use manifest_backup::ManifestBackup;
pub use upgrade_executor::{UpgradeError, UpgradeExecutor};
