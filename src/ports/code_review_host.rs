//! Code Review Host Port - Opening pull requests on the hosting service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for the hosted code review API.
///
/// Implementations hold their own credential; callers only describe the
/// change they want reviewed.
#[async_trait]
pub trait CodeReviewHost: Send + Sync {
    /// Open a pull request and return its web URL.
    async fn open_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<String, CodeReviewError>;
}

/// Everything needed to open one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRequest {
    pub owner: String,
    pub repo: String,
    /// Branch carrying the change.
    pub head: String,
    /// Branch the change should merge into.
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Errors from the code review host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeReviewError {
    /// Credential rejected or lacking permission.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited by code review host")]
    RateLimited,

    /// Transport-level failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The host answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A success response without a usable pull request URL.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
