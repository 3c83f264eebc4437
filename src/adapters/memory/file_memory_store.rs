//! File-based Memory Store Adapter
//!
//! Persists the session memory as a single pretty-printed JSON document:
//!
//! ```json
//! { "last_updated": [ ... ], "successful_upgrades": 0, "repo_url": "" }
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::memory::SessionMemory;
use crate::ports::{MemoryStore, MemoryStoreError};

/// JSON file storage for the session memory.
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    path: PathBuf,
}

impl FileMemoryStore {
    /// Create a store backed by the file at `path`
    ///
    /// The parent directory is created on first save.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent(&self) -> Result<(), MemoryStoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| MemoryStoreError::io(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    async fn load(&self) -> Result<Option<SessionMemory>, MemoryStoreError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MemoryStoreError::io(e.to_string())),
        };

        let memory = serde_json::from_str(&json)
            .map_err(|e| MemoryStoreError::Corrupt(e.to_string()))?;
        Ok(Some(memory))
    }

    async fn save(&self, memory: &SessionMemory) -> Result<(), MemoryStoreError> {
        self.ensure_parent().await?;

        let json = serde_json::to_string_pretty(memory)
            .map_err(|e| MemoryStoreError::Serialization(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written file.
        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
