//! SessionMemoryStore - Owns the session memory and keeps its file current.
//!
//! The in-process `SessionMemory` is authoritative. Every mutation is
//! applied first and persisted immediately after, so a failed write never
//! lets a stale record survive a reset.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::Timestamp;
use crate::domain::memory::{MemoryStats, SessionMemory};
use crate::ports::{MemoryStore, MemoryStoreError};

/// Session memory could not be written or read back.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The memory changed in process but could not be persisted.
    #[error("could not persist session memory")]
    Persist(#[from] MemoryStoreError),

    #[error("could not read persisted session memory")]
    Load(#[source] MemoryStoreError),
}

/// Handler for session memory mutations.
pub struct SessionMemoryStore {
    store: Arc<dyn MemoryStore>,
    memory: SessionMemory,
}

impl SessionMemoryStore {
    /// Wraps `store` with an empty in-process memory.
    ///
    /// Nothing is read from the store: a session always starts empty.
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self {
            store,
            memory: SessionMemory::empty(),
        }
    }

    /// Starts a fresh session bound to `repo_url` and overwrites the file.
    pub async fn start_session(&mut self, repo_url: &str) -> Result<(), MemoryError> {
        self.memory.reset();
        self.memory.bind(repo_url);
        self.persist().await
    }

    /// Appends `cycle` and persists.
    pub async fn record(&mut self, cycle: CycleRecord) -> Result<(), MemoryError> {
        tracing::info!(
            branch = %cycle.branch,
            packages = cycle.packages.len(),
            "Recording cycle"
        );
        self.memory.record(cycle);
        self.persist().await
    }

    /// Replaces the memory with the empty state and persists it.
    pub async fn reset(&mut self) -> Result<(), MemoryError> {
        tracing::info!("Session memory reset");
        self.memory.reset();
        self.persist().await
    }

    /// Binds the session to `repo_url` and persists.
    pub async fn bind(&mut self, repo_url: &str) -> Result<(), MemoryError> {
        self.memory.bind(repo_url);
        self.persist().await
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn stats(&self) -> MemoryStats {
        self.memory.stats(Timestamp::now())
    }

    /// What the store currently holds, independent of the in-process memory.
    ///
    /// Read path for status displays running outside the cycling process.
    pub async fn persisted(&self) -> Result<Option<SessionMemory>, MemoryError> {
        self.store.load().await.map_err(MemoryError::Load)
    }

    async fn persist(&self) -> Result<(), MemoryError> {
        self.store.save(&self.memory).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemoryStore;
    use async_trait::async_trait;

    fn cycle(packages: &[&str]) -> CycleRecord {
        CycleRecord::new(
            "auto/dependency-update-1",
            packages.iter().map(|p| p.to_string()).collect(),
            "https://github.com/acme/widgets/pull/1",
            Timestamp::now(),
        )
    }

    struct FailingStore;

    #[async_trait]
    impl MemoryStore for FailingStore {
        async fn load(&self) -> Result<Option<SessionMemory>, MemoryStoreError> {
            Err(MemoryStoreError::Corrupt("expected value at line 1".to_string()))
        }

        async fn save(&self, _memory: &SessionMemory) -> Result<(), MemoryStoreError> {
            Err(MemoryStoreError::io("disk full"))
        }
    }

    #[tokio::test]
    async fn start_session_overwrites_with_bound_empty_state() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let mut stale = SessionMemory::empty();
        stale.record(cycle(&["lodash"]));
        store.save(&stale).await.unwrap();

        let mut memory = SessionMemoryStore::new(store.clone());
        memory
            .start_session("https://github.com/acme/widgets")
            .await
            .unwrap();

        let saved = store.snapshot().await.unwrap();
        assert!(saved.is_empty());
        assert_eq!(saved.repo_url(), Some("https://github.com/acme/widgets"));
    }

    #[tokio::test]
    async fn record_persists_immediately() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let mut memory = SessionMemoryStore::new(store.clone());

        memory.record(cycle(&["lodash", "axios"])).await.unwrap();

        let saved = store.snapshot().await.unwrap();
        assert_eq!(saved.history().len(), 1);
        assert_eq!(saved.successful_upgrades(), 2);
        assert_eq!(memory.stats().recently_upgraded_count, 2);
    }

    #[tokio::test]
    async fn reset_then_record_leaves_only_the_new_record() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let mut memory = SessionMemoryStore::new(store.clone());
        memory.record(cycle(&["react"])).await.unwrap();
        memory.record(cycle(&["vue", "vite"])).await.unwrap();

        memory.reset().await.unwrap();
        let fresh = cycle(&["lodash"]);
        memory.record(fresh.clone()).await.unwrap();

        assert_eq!(memory.memory().history(), &[fresh]);
        assert_eq!(memory.memory().successful_upgrades(), 1);
        assert_eq!(store.snapshot().await.unwrap(), memory.memory().clone());
    }

    #[tokio::test]
    async fn failed_persist_still_resets_in_process() {
        let mut memory = SessionMemoryStore::new(Arc::new(FailingStore));
        let _ = memory.record(cycle(&["lodash"])).await;

        let result = memory.reset().await;

        assert!(matches!(result, Err(MemoryError::Persist(_))));
        assert!(memory.memory().is_empty());
    }

    #[tokio::test]
    async fn bind_persists_repository() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let mut memory = SessionMemoryStore::new(store.clone());

        memory.bind("https://github.com/acme/widgets").await.unwrap();

        assert_eq!(
            store.snapshot().await.unwrap().repo_url(),
            Some("https://github.com/acme/widgets")
        );
    }

    #[tokio::test]
    async fn persisted_reads_what_another_process_wrote() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let mut writer = SessionMemoryStore::new(store.clone());
        writer
            .start_session("https://github.com/acme/widgets")
            .await
            .unwrap();
        writer.record(cycle(&["lodash", "axios"])).await.unwrap();

        let reader = SessionMemoryStore::new(store);
        let persisted = reader.persisted().await.unwrap().unwrap();

        assert!(reader.memory().is_empty());
        assert_eq!(persisted.successful_upgrades(), 2);
        assert_eq!(persisted.repo_url(), Some("https://github.com/acme/widgets"));
    }

    #[tokio::test]
    async fn persisted_is_none_before_first_save() {
        let reader = SessionMemoryStore::new(Arc::new(InMemoryMemoryStore::new()));
        assert_eq!(reader.persisted().await.unwrap(), None);
    }

    #[tokio::test]
    async fn persisted_surfaces_corrupt_store() {
        let reader = SessionMemoryStore::new(Arc::new(FailingStore));
        assert!(matches!(
            reader.persisted().await,
            Err(MemoryError::Load(MemoryStoreError::Corrupt(_)))
        ));
    }
}
