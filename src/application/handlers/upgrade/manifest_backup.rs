//! ManifestBackup - Snapshot of the manifest and lock file.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use super::UpgradeError;
use crate::domain::dependency::{LOCK_FILE_NAME, MANIFEST_FILE_NAME};

/// Saved copy of the files an upgrade step mutates.
///
/// Dropping the backup discards it; `restore` puts both files back exactly
/// as they were, removing a lock file that did not exist at snapshot time.
#[derive(Debug, Clone)]
pub struct ManifestBackup {
    manifest_path: PathBuf,
    manifest: Vec<u8>,
    digest: [u8; 32],
    lock_path: PathBuf,
    lock: Option<Vec<u8>>,
}

impl ManifestBackup {
    /// Reads both files under `project`. The manifest must exist.
    pub async fn snapshot(project: &Path) -> Result<Self, UpgradeError> {
        let manifest_path = project.join(MANIFEST_FILE_NAME);
        let lock_path = project.join(LOCK_FILE_NAME);

        let manifest = tokio::fs::read(&manifest_path)
            .await
            .map_err(|e| UpgradeError::backup(&manifest_path, e))?;
        let lock = match tokio::fs::read(&lock_path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(UpgradeError::backup(&lock_path, e)),
        };

        Ok(Self {
            digest: sha256(&manifest),
            manifest_path,
            manifest,
            lock_path,
            lock,
        })
    }

    /// Manifest content as captured.
    pub fn manifest_bytes(&self) -> &[u8] {
        &self.manifest
    }

    /// Hex SHA-256 of the captured manifest.
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Writes the snapshot back and checks the manifest digest.
    pub async fn restore(&self) -> Result<(), UpgradeError> {
        tokio::fs::write(&self.manifest_path, &self.manifest)
            .await
            .map_err(|e| UpgradeError::backup(&self.manifest_path, e))?;

        match &self.lock {
            Some(bytes) => tokio::fs::write(&self.lock_path, bytes)
                .await
                .map_err(|e| UpgradeError::backup(&self.lock_path, e))?,
            None => match tokio::fs::remove_file(&self.lock_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(UpgradeError::backup(&self.lock_path, e)),
            },
        }

        let restored = tokio::fs::read(&self.manifest_path)
            .await
            .map_err(|e| UpgradeError::backup(&self.manifest_path, e))?;
        if sha256(&restored) != self.digest {
            return Err(UpgradeError::RestoreMismatch {
                expected: self.digest_hex(),
            });
        }

        tracing::info!(digest = %self.digest_hex(), "Manifest restored from backup");
        Ok(())
    }
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}
