//! Reset Signal Port - External triggers that end the current session.
//!
//! A configuration save or a presentation-layer reload asks for the session
//! memory to be wiped. The orchestrator polls this port at the start of each
//! cycle, never mid-cycle.

use async_trait::async_trait;

/// Port for polling an external reset trigger.
#[async_trait]
pub trait ResetSignal: Send + Sync {
    /// Returns `true` once per trigger; polling consumes the trigger.
    async fn take_reset(&self) -> bool;
}
