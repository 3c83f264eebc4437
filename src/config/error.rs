//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Repository URL must look like https://host/owner/name")]
    InvalidRepoUrl,

    #[error("API base URL must use http or https")]
    InvalidApiBaseUrl,

    #[error("Check interval must be greater than zero")]
    InvalidCheckInterval,

    #[error("Branch prefix must be non-empty and usable in a git branch name")]
    InvalidBranchPrefix,

    #[error("Command timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid commit author email address")]
    InvalidAuthorEmail,
}
