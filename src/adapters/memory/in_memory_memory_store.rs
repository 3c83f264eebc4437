//! In-Memory Memory Store Adapter
//!
//! Keeps the persisted projection in process memory. Useful for testing and
//! for embedding without a memory file.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::memory::SessionMemory;
use crate::ports::{MemoryStore, MemoryStoreError};

/// In-memory storage for the session memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemoryStore {
    stored: Arc<RwLock<Option<SessionMemory>>>,
    saves: Arc<RwLock<u64>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved memory, if any
    pub async fn snapshot(&self) -> Option<SessionMemory> {
        self.stored.read().await.clone()
    }

    /// Number of completed saves
    pub async fn save_count(&self) -> u64 {
        *self.saves.read().await
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn load(&self) -> Result<Option<SessionMemory>, MemoryStoreError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, memory: &SessionMemory) -> Result<(), MemoryStoreError> {
        *self.stored.write().await = Some(memory.clone());
        *self.saves.write().await += 1;
        Ok(())
    }
}
