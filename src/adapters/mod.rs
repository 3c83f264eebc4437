//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `process` - Shared command runner (timeouts, captured output, redaction)
//! - `git` - Source control over the git CLI
//! - `npm` - Package management over the npm CLI
//! - `github` - Pull requests over the GitHub REST API
//! - `memory` - Session memory persistence (JSON file, in-memory)
//! - `signals` - External session reset triggers

pub mod git;
pub mod github;
pub mod memory;
pub mod npm;
pub mod process;
pub mod signals;

pub use git::GitCli;
pub use github::{GitHubClient, GitHubConfig};
pub use memory::{FileMemoryStore, InMemoryMemoryStore};
pub use npm::NpmCli;
pub use process::{CommandOutput, CommandRunner, ProcessError};
pub use signals::{AnyResetSignal, ConfigFileWatch, ResetFlag};
