//! CycleRecord - what a pull-request-producing cycle leaves in memory.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Immutable trace of one cycle that opened a pull request.
///
/// Field names match the persisted memory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub branch: String,
    pub packages: Vec<String>,
    pub timestamp: Timestamp,
    pub pr_url: String,
}

impl CycleRecord {
    pub fn new(
        branch: impl Into<String>,
        packages: Vec<String>,
        pr_url: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            branch: branch.into(),
            packages,
            timestamp,
            pr_url: pr_url.into(),
        }
    }

    /// Number of packages this cycle upgraded.
    pub fn upgraded_count(&self) -> u64 {
        self.packages.len() as u64
    }

    pub fn touches(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }
}
