//! Orchestration handlers - one cycle, and the loop that repeats it.

mod cycle_orchestrator;
mod scheduler;

pub use cycle_orchestrator::{CycleError, CycleOrchestrator, CyclePorts};
pub use scheduler::Scheduler;
