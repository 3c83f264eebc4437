//! GitHub adapter - `CodeReviewHost` over the GitHub REST API.

mod github_client;

pub use github_client::{GitHubClient, GitHubConfig};
