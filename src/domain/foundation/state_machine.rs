//! State machine trait for lifecycle enums.
//!
//! Gives every phase-like enum the same validated-transition surface, so the
//! orchestrator can refuse an out-of-order step instead of silently skipping it.

use super::ValidationError;

/// Trait for enums whose values form a state machine.
///
/// Implementors list their legal edges; `transition_to` and `is_terminal`
/// come for free.
///
/// ```ignore
/// let next = CyclePhase::Cloning.transition_to(CyclePhase::Installing)?;
/// assert!(CyclePhase::NoAction.transition_to(CyclePhase::Publishing).is_err());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition, or explains why it is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
