//! Cycle scheduling and commit identity configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::Timestamp;
use crate::domain::publish::BranchName;

/// How often cycles run and how their commits are labelled
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Seconds to wait between cycles
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Upgrade branches are named `{branch_prefix}-{unix_seconds}`
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    #[serde(default = "default_author_name")]
    pub commit_author_name: String,

    #[serde(default = "default_author_email")]
    pub commit_author_email: String,
}

impl AgentConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.check_interval_secs == 0 {
            return Err(ValidationError::InvalidCheckInterval);
        }
        if BranchName::generate(&self.branch_prefix, Timestamp::now()).is_err() {
            return Err(ValidationError::InvalidBranchPrefix);
        }
        if !self.commit_author_email.contains('@') {
            return Err(ValidationError::InvalidAuthorEmail);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            branch_prefix: default_branch_prefix(),
            commit_author_name: default_author_name(),
            commit_author_email: default_author_email(),
        }
    }
}

fn default_check_interval() -> u64 {
    3600
}

fn default_branch_prefix() -> String {
    "auto/dependency-update".to_string()
}

fn default_author_name() -> String {
    "Dependency Guardian".to_string()
}

fn default_author_email() -> String {
    "dependency-guardian@users.noreply.github.com".to_string()
}
