//! Owner/name coordinates of the monitored repository.

use std::fmt;

use crate::domain::foundation::ValidationError;

/// `owner/name` of a hosted repository plus the host it lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    /// Parses `https://host/owner/name(.git)(/)`.
    pub fn parse(repo_url: &str) -> Result<Self, ValidationError> {
        let trimmed = repo_url.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("repo_url"));
        }

        let without_scheme = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(|| ValidationError::invalid_format("repo_url", "missing scheme"))?;
        let without_auth = without_scheme
            .rsplit_once('@')
            .map(|(_, rest)| rest)
            .unwrap_or(without_scheme);

        let path = without_auth.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [host, .., owner, name] => Ok(Self {
                host: host.to_string(),
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ValidationError::invalid_format(
                "repo_url",
                "expected https://host/owner/name",
            )),
        }
    }

    /// `https://{credential}@host/owner/name` for pushes and clones.
    ///
    /// The returned string embeds the secret; never log it.
    pub fn authenticated_url(&self, credential: &str) -> String {
        format!(
            "https://{}@{}/{}/{}.git",
            credential, self.host, self.owner, self.name
        )
    }

    /// Replaces `credential` in any text with a fixed marker.
    pub fn redact(text: &str, credential: &str) -> String {
        if credential.is_empty() {
            return text.to_string();
        }
        text.replace(credential, "***")
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
