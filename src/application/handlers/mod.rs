//! Application handlers.
//!
//! Each handler owns one concern of a cycle and talks to the outside world
//! only through ports. The orchestration handlers sequence the others.

pub mod inspection;
pub mod memory;
pub mod orchestration;
pub mod publishing;
pub mod repository;
pub mod upgrade;

#[cfg(test)]
pub(crate) mod test_support;

pub use inspection::{DependencyInspector, ScanError};
pub use memory::{MemoryError, SessionMemoryStore};
pub use orchestration::{CycleError, CycleOrchestrator, CyclePorts, Scheduler};
pub use publishing::{ChangePublisher, CommitIdentity, PublishCommand, PublishError, PublishedChange};
pub use repository::{CloneError, RepositoryController, WorkingCopy};
pub use upgrade::{ManifestBackup, UpgradeError, UpgradeExecutor};
