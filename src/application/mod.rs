//! Application layer - Handlers that drive the update cycle.
//!
//! This layer sequences domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{CycleOrchestrator, CyclePorts, Scheduler};
