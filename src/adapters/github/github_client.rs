//! GitHub REST API Adapter
//!
//! Opens pull requests through `POST /repos/{owner}/{repo}/pulls`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{CodeReviewError, CodeReviewHost, PullRequestRequest};

/// Configuration for the GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    token: Secret<String>,
    /// API root (default: https://api.github.com).
    pub base_url: String,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            base_url: "https://api.github.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `CodeReviewHost` implementation for GitHub.
pub struct GitHubClient {
    config: GitHubConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("dependency-guardian/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    fn pulls_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/pulls", self.config.base_url, owner, repo)
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, CodeReviewError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_error_status(status.as_u16(), &body))
    }
}

/// Translates a failed API status into the port's error.
fn map_error_status(status: u16, body: &str) -> CodeReviewError {
    let parsed: Option<ErrorResponse> = serde_json::from_str(body).ok();
    let message = match &parsed {
        Some(err) => {
            let mut message = err.message.clone().unwrap_or_default();
            for detail in &err.errors {
                let detail = detail
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| detail.to_string());
                message.push_str(&format!("; {detail}"));
            }
            message
        }
        None => body.trim().to_string(),
    };

    match status {
        401 => CodeReviewError::AuthenticationFailed,
        429 => CodeReviewError::RateLimited,
        403 if message.to_lowercase().contains("rate limit") => CodeReviewError::RateLimited,
        403 => CodeReviewError::AuthenticationFailed,
        _ => CodeReviewError::Rejected { status, message },
    }
}

#[async_trait]
impl CodeReviewHost for GitHubClient {
    async fn open_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<String, CodeReviewError> {
        let payload = CreatePullRequest {
            title: &request.title,
            body: &request.body,
            head: &request.head,
            base: &request.base,
        };

        tracing::info!(
            owner = %request.owner,
            repo = %request.repo,
            head = %request.head,
            base = %request.base,
            "Opening pull request"
        );

        let response = self
            .client
            .post(self.pulls_url(&request.owner, &request.repo))
            .header(
                "Authorization",
                format!("token {}", self.config.token.expose_secret()),
            )
            .header("Accept", "application/vnd.github.v3+json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| CodeReviewError::Network(e.to_string()))?;

        let response = self.handle_response_status(response).await?;

        let created: PullRequestResponse = response
            .json()
            .await
            .map_err(|e| CodeReviewError::InvalidResponse(e.to_string()))?;

        match created.html_url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(CodeReviewError::InvalidResponse(
                "response has no html_url".to_string(),
            )),
        }
    }
}
