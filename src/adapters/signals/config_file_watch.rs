//! Reset on configuration save.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;

use crate::ports::ResetSignal;

/// Fires when the watched file's modification time changes.
///
/// A file that disappears does not fire; one that reappears with a new
/// modification time does.
#[derive(Debug)]
pub struct ConfigFileWatch {
    path: PathBuf,
    last_seen: Mutex<Option<SystemTime>>,
}

impl ConfigFileWatch {
    /// Starts watching `path`, taking its current state as the baseline.
    pub async fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let baseline = modified(&path).await;
        Self {
            path,
            last_seen: Mutex::new(baseline),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .ok()
}

#[async_trait]
impl ResetSignal for ConfigFileWatch {
    async fn take_reset(&self) -> bool {
        let Some(current) = modified(&self.path).await else {
            return false;
        };

        let mut last_seen = self.last_seen.lock().await;
        if *last_seen == Some(current) {
            return false;
        }
        *last_seen = Some(current);
        tracing::info!(path = %self.path.display(), "Configuration file changed");
        true
    }
}
