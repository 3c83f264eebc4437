//! Hosted repository configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::publish::RepoCoordinates;

/// Repository and credential for the hosting service
///
/// `repo_url` and `token` may be empty at rest; a cycle refuses to start
/// until both are filled in.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GithubConfig {
    /// Repository to keep current, e.g. `https://github.com/owner/name`
    #[serde(default)]
    pub repo_url: String,

    /// Personal access token with repository write access
    #[serde(default)]
    pub token: String,

    /// Branch pull requests target; defaults to the cloned checkout
    pub base_branch: Option<String>,

    /// REST API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl GithubConfig {
    /// Token wrapped so it cannot leak through `Debug` or logs
    pub fn token(&self) -> Secret<String> {
        Secret::new(self.token.clone())
    }

    pub fn coordinates(&self) -> Option<RepoCoordinates> {
        RepoCoordinates::parse(&self.repo_url).ok()
    }

    /// Validate repository configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.repo_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("github.repo_url"));
        }
        if self.token.trim().is_empty() {
            return Err(ValidationError::MissingRequired("github.token"));
        }
        if self.coordinates().is_none() {
            return Err(ValidationError::InvalidRepoUrl);
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}
