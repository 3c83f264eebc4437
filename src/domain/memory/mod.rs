//! Memory module - session-scoped history of published cycles.

mod session_memory;

pub use session_memory::{MemoryStats, SessionMemory};
