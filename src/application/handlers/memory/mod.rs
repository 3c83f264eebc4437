//! Memory handlers - the session memory and its persisted projection.

mod session_memory_store;

pub use session_memory_store::{MemoryError, SessionMemoryStore};
