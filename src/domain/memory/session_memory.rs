//! SessionMemory - the single piece of state that outlives a cycle.
//!
//! Lives from one reset event to the next. The only mutators are `record`,
//! `reset` and `bind`; everything else is a read.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::Timestamp;

/// History of pull-request-producing cycles for the current session.
///
/// History is kept most-recent-last. The serialized form is the on-disk
/// memory file: `last_updated`, `successful_upgrades`, `repo_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMemory {
    #[serde(rename = "last_updated", default)]
    history: Vec<CycleRecord>,
    #[serde(default)]
    successful_upgrades: u64,
    #[serde(default)]
    repo_url: String,
}

/// Read-side summary for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub cycles: usize,
    pub successful_upgrades: u64,
    pub last_cycle_at: Option<Timestamp>,
    pub recently_upgraded_count: usize,
}

impl SessionMemory {
    /// Empty memory bound to no repository.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a cycle and counts its packages as upgraded.
    pub fn record(&mut self, cycle: CycleRecord) {
        self.successful_upgrades += cycle.upgraded_count();
        self.history.push(cycle);
    }

    /// Replaces every field with the empty state. Nothing survives.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Associates the session with the monitored repository.
    pub fn bind(&mut self, repo_url: impl Into<String>) {
        self.repo_url = repo_url.into();
    }

    pub fn history(&self) -> &[CycleRecord] {
        &self.history
    }

    pub fn successful_upgrades(&self) -> u64 {
        self.successful_upgrades
    }

    /// Bound repository URL, or `None` after a reset.
    pub fn repo_url(&self) -> Option<&str> {
        (!self.repo_url.is_empty()).then_some(self.repo_url.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.successful_upgrades == 0
    }

    /// True when the counter equals the package total across history.
    pub fn is_consistent(&self) -> bool {
        let total: u64 = self.history.iter().map(CycleRecord::upgraded_count).sum();
        total == self.successful_upgrades
    }

    /// Distinct package names upgraded within `within` of `now`, sorted.
    pub fn recently_upgraded(&self, now: Timestamp, within: Duration) -> Vec<String> {
        let cutoff = now.minus(within);
        self.history
            .iter()
            .filter(|cycle| !cycle.timestamp.is_before(&cutoff))
            .flat_map(|cycle| cycle.packages.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_been_upgraded(&self, package: &str, now: Timestamp, within: Duration) -> bool {
        let cutoff = now.minus(within);
        self.history
            .iter()
            .any(|cycle| !cycle.timestamp.is_before(&cutoff) && cycle.touches(package))
    }

    /// Summary using a seven day "recent" window.
    pub fn stats(&self, now: Timestamp) -> MemoryStats {
        MemoryStats {
            cycles: self.history.len(),
            successful_upgrades: self.successful_upgrades,
            last_cycle_at: self.history.last().map(|c| c.timestamp),
            recently_upgraded_count: self.recently_upgraded(now, Duration::days(7)).len(),
        }
    }
}
