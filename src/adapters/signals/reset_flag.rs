//! Programmatic reset trigger.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ports::ResetSignal;

/// A latch any holder of a clone can raise.
///
/// Raising it several times before the next poll still counts as one reset.
#[derive(Debug, Clone, Default)]
pub struct ResetFlag {
    raised: Arc<AtomicBool>,
}

impl ResetFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResetSignal for ResetFlag {
    async fn take_reset(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}
