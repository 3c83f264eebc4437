//! Memory adapters - persistence for the session memory.
//!
//! - `FileMemoryStore` - JSON file on disk (production)
//! - `InMemoryMemoryStore` - process memory (tests and embedding)

mod file_memory_store;
mod in_memory_memory_store;

pub use file_memory_store::FileMemoryStore;
pub use in_memory_memory_store::InMemoryMemoryStore;
