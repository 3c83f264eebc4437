//! External tool configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Executables the adapters invoke and how long they may run
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_npm")]
    pub npm: String,

    /// Upper bound for any single command, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CommandsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.git.trim().is_empty() {
            return Err(ValidationError::MissingRequired("commands.git"));
        }
        if self.npm.trim().is_empty() {
            return Err(ValidationError::MissingRequired("commands.npm"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            npm: default_npm(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_timeout() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_defaults() {
        let config = CommandsConfig::default();
        assert_eq!(config.git, "git");
        assert_eq!(config.npm, "npm");
        assert_eq!(config.timeout(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CommandsConfig {
            timeout_secs: 0,
            ..CommandsConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
