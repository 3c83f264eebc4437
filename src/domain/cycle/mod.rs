//! Cycle module - one clone-to-cleanup pass and how it ended.
//!
//! A cycle walks the `CyclePhase` state machine. Only cycles that opened a
//! pull request leave a `CycleRecord` behind; every cycle yields a
//! `CycleReport` for whoever displays status.

mod outcome;
mod phase;
mod record;

pub use outcome::{CycleOutcome, CycleReport, FailureKind};
pub use phase::CyclePhase;
pub use record::CycleRecord;
