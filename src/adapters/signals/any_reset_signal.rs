//! Fan-in over several reset triggers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::ResetSignal;

/// Fires when any inner signal fires.
///
/// Every inner signal is polled on each call so that simultaneous triggers
/// are all consumed together and do not cause a second reset later.
#[derive(Clone, Default)]
pub struct AnyResetSignal {
    signals: Vec<Arc<dyn ResetSignal>>,
}

impl AnyResetSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, signal: Arc<dyn ResetSignal>) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[async_trait]
impl ResetSignal for AnyResetSignal {
    async fn take_reset(&self) -> bool {
        let mut fired = false;
        for signal in &self.signals {
            fired |= signal.take_reset().await;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::signals::ResetFlag;

    #[tokio::test]
    async fn fires_when_any_fires_and_drains_all() {
        let first = ResetFlag::new();
        let second = ResetFlag::new();
        let any = AnyResetSignal::new()
            .with(Arc::new(first.clone()))
            .with(Arc::new(second.clone()));

        assert!(!any.take_reset().await);

        first.raise();
        second.raise();
        assert!(any.take_reset().await);
        assert!(!first.is_raised());
        assert!(!second.is_raised());
        assert!(!any.take_reset().await);
    }

    #[tokio::test]
    async fn empty_fan_in_never_fires() {
        let any = AnyResetSignal::new();
        assert!(any.is_empty());
        assert!(!any.take_reset().await);
    }
}
