//! Memory Store Port - Persisted projection of the session memory.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::memory::SessionMemory;

/// Port for persisting `SessionMemory`.
///
/// # Contract
///
/// - `save` replaces the persisted state wholesale; there is no merge.
/// - `load` returns `None` when nothing has been persisted yet.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn load(&self) -> Result<Option<SessionMemory>, MemoryStoreError>;

    async fn save(&self, memory: &SessionMemory) -> Result<(), MemoryStoreError>;
}

/// Errors from memory persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    #[error("IO error: {message}")]
    Io { message: String },

    /// Persisted content exists but does not have the memory shape.
    #[error("corrupt memory file: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MemoryStoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MemoryStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
