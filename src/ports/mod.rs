//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application layer and the outside world. Adapters implement these
//! ports.
//!
//! - `SourceControl` - clone, branch, stage, commit and push
//! - `PackageManager` - install, outdated report, single-package upgrade, verify
//! - `CodeReviewHost` - open a pull request
//! - `MemoryStore` - persist the session memory
//! - `ResetSignal` - poll external session reset triggers

mod code_review_host;
mod memory_store;
mod package_manager;
mod reset_signal;
mod source_control;

pub use code_review_host::{CodeReviewError, CodeReviewHost, PullRequestRequest};
pub use memory_store::{MemoryStore, MemoryStoreError};
pub use package_manager::{PackageManager, PackageManagerError};
pub use reset_signal::ResetSignal;
pub use source_control::{SourceControl, SourceControlError, StatusEntry};
