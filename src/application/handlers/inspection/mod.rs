//! Inspection handlers - what is outdated in a working copy.

mod dependency_inspector;

pub use dependency_inspector::{DependencyInspector, ScanError};
