//! Repository handlers - working copy lifecycle.

mod repository_controller;

pub use repository_controller::{CloneError, RepositoryController, WorkingCopy};
