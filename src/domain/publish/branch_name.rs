//! Branch naming for upgrade branches.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

/// A branch named `{prefix}-{unix_seconds}`.
///
/// Two names generated within the same second collide; the push then fails
/// and the cycle ends as failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    pub fn generate(prefix: &str, at: Timestamp) -> Result<Self, ValidationError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(ValidationError::empty_field("branch_prefix"));
        }
        if prefix.chars().any(|c| c.is_whitespace() || c == '~' || c == '^' || c == ':') {
            return Err(ValidationError::invalid_format(
                "branch_prefix",
                "contains characters git refuses in branch names",
            ));
        }
        Ok(Self(format!("{}-{}", prefix, at.as_unix_secs())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
