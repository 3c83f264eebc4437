//! Publish module - naming and wording of the proposed change.
//!
//! - `BranchName` - `{prefix}-{unix_seconds}` branch naming
//! - `RepoCoordinates` - owner/name parsed from the repository URL
//! - `PullRequestDraft` - title, body and commit message for a change set

mod branch_name;
mod draft;
mod repo_coordinates;

pub use branch_name::BranchName;
pub use draft::{PullRequestDraft, MAX_TITLE_CHARS};
pub use repo_coordinates::RepoCoordinates;
