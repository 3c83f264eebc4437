//! CyclePhase enum for tracking where a cycle is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle phase of one maintenance cycle.
///
/// ```text
/// Idle → Cloning → Installing → Scanning ─┬→ NoAction ───────────────────────┐
///                                         └→ Upgrading → Publishing → Recording ┴→ CleaningUp → Idle
/// any working phase → Failed → CleaningUp
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    #[default]
    Idle,
    Cloning,
    Installing,
    Scanning,
    NoAction,
    Upgrading,
    Publishing,
    Recording,
    CleaningUp,
    Failed,
}

impl CyclePhase {
    /// Phases that perform external work and may therefore fail.
    pub fn can_fail(&self) -> bool {
        self.can_transition_to(&CyclePhase::Failed)
    }
}

impl StateMachine for CyclePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CyclePhase::*;
        matches!(
            (self, target),
            (Idle, Cloning)
                | (Idle, Failed)
                | (Cloning, Installing)
                | (Cloning, Failed)
                | (Installing, Scanning)
                | (Installing, Failed)
                | (Scanning, NoAction)
                | (Scanning, Upgrading)
                | (Scanning, Failed)
                | (Upgrading, Publishing)
                | (Upgrading, Failed)
                | (Publishing, Recording)
                | (Publishing, Failed)
                | (Recording, CleaningUp)
                | (Recording, Failed)
                | (NoAction, CleaningUp)
                | (Failed, CleaningUp)
                | (CleaningUp, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CyclePhase::*;
        match self {
            Idle => vec![Cloning, Failed],
            Cloning => vec![Installing, Failed],
            Installing => vec![Scanning, Failed],
            Scanning => vec![NoAction, Upgrading, Failed],
            Upgrading => vec![Publishing, Failed],
            Publishing => vec![Recording, Failed],
            Recording => vec![CleaningUp, Failed],
            NoAction | Failed => vec![CleaningUp],
            CleaningUp => vec![Idle],
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Cloning => "cloning",
            CyclePhase::Installing => "installing",
            CyclePhase::Scanning => "scanning",
            CyclePhase::NoAction => "no_action",
            CyclePhase::Upgrading => "upgrading",
            CyclePhase::Publishing => "publishing",
            CyclePhase::Recording => "recording",
            CyclePhase::CleaningUp => "cleaning_up",
            CyclePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}
