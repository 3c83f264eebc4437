//! How a cycle ended, in a shape a status consumer can poll.

use serde::{Deserialize, Serialize};

use super::{CyclePhase, CycleRecord};
use crate::domain::foundation::{CycleId, Timestamp};

/// Error category of a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Config,
    Clone,
    Scan,
    Upgrade,
    Publish,
    Memory,
}

/// Terminal result of one cycle.
///
/// `NoAction` and `Failed` both mean "no pull request" but are kept apart so
/// a consumer can tell "everything is current" from "something broke".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    NoAction,
    Published { record: CycleRecord },
    Failed {
        phase: CyclePhase,
        kind: FailureKind,
        message: String,
    },
}

impl CycleOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CycleOutcome::Failed { .. })
    }

    pub fn record(&self) -> Option<&CycleRecord> {
        match self {
            CycleOutcome::Published { record } => Some(record),
            _ => None,
        }
    }
}

/// Everything a status display needs about one finished cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub cycle_number: u64,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub outcome: CycleOutcome,
}
