//! ChangePublisher - Proposes an upgrade as a pull request.
//!
//! Leaves cleanup of the working copy to the orchestrator.

use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use thiserror::Error;

use crate::application::handlers::repository::WorkingCopy;
use crate::domain::dependency::{UpgradeResult, LOCK_FILE_NAME, MANIFEST_FILE_NAME};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::publish::{BranchName, PullRequestDraft, RepoCoordinates};
use crate::ports::{
    CodeReviewError, CodeReviewHost, PullRequestRequest, SourceControl, SourceControlError,
};

/// Failures while publishing a change.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("invalid publish input: {0}")]
    Invalid(#[from] ValidationError),

    /// A version control step failed; `step` names which one.
    #[error("git {step} failed")]
    Git {
        step: &'static str,
        #[source]
        source: SourceControlError,
    },

    /// Staging left nothing to commit.
    #[error("no staged changes to commit")]
    NothingStaged,

    #[error("could not inspect working copy: {0}")]
    Io(String),

    #[error("pull request creation failed")]
    PullRequest(#[from] CodeReviewError),
}

impl PublishError {
    fn git(step: &'static str) -> impl FnOnce(SourceControlError) -> Self {
        move |source| Self::Git { step, source }
    }
}

/// Name and email recorded on upgrade commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Command to publish one set of upgrades.
#[derive(Debug)]
pub struct PublishCommand<'a> {
    pub working_copy: &'a WorkingCopy,
    pub results: &'a [UpgradeResult],
    pub repo_url: &'a str,
    pub branch_prefix: &'a str,
    pub credential: &'a Secret<String>,
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedChange {
    pub branch: String,
    pub base: String,
    pub pr_url: String,
}

/// Handler for publishing upgrades.
pub struct ChangePublisher {
    source_control: Arc<dyn SourceControl>,
    review_host: Arc<dyn CodeReviewHost>,
    identity: CommitIdentity,
    base_branch: Option<String>,
}

impl ChangePublisher {
    pub fn new(
        source_control: Arc<dyn SourceControl>,
        review_host: Arc<dyn CodeReviewHost>,
        identity: CommitIdentity,
    ) -> Self {
        Self {
            source_control,
            review_host,
            identity,
            base_branch: None,
        }
    }

    /// Targets `base` instead of the branch checked out by the clone.
    pub fn with_base_branch(mut self, base: Option<String>) -> Self {
        self.base_branch = base.filter(|b| !b.trim().is_empty());
        self
    }

    pub async fn publish(&self, cmd: PublishCommand<'_>) -> Result<PublishedChange, PublishError> {
        let now = Timestamp::now();
        let coordinates = RepoCoordinates::parse(cmd.repo_url)?;
        let branch = BranchName::generate(cmd.branch_prefix, now)?;
        let repo = cmd.working_copy.path();

        // 1. Base branch, read before switching away from it
        let base = match &self.base_branch {
            Some(base) => base.clone(),
            None => self
                .source_control
                .current_branch(repo)
                .await
                .map_err(PublishError::git("rev-parse"))?,
        };

        // 2. Branch
        self.source_control
            .create_branch(repo, branch.as_str())
            .await
            .map_err(PublishError::git("checkout"))?;

        // 3. Stage exactly the manifest and, if present, the lock file
        let mut paths = vec![MANIFEST_FILE_NAME];
        let has_lock = tokio::fs::try_exists(cmd.working_copy.lock_path())
            .await
            .map_err(|e| PublishError::Io(e.to_string()))?;
        if has_lock {
            paths.push(LOCK_FILE_NAME);
        }
        self.source_control
            .stage(repo, &paths)
            .await
            .map_err(PublishError::git("add"))?;

        let status = self
            .source_control
            .status(repo)
            .await
            .map_err(PublishError::git("status"))?;
        if !status.iter().any(|entry| entry.is_staged()) {
            return Err(PublishError::NothingStaged);
        }

        // 4. Commit
        let draft = PullRequestDraft::render(cmd.results, now);
        self.source_control
            .configure_identity(repo, &self.identity.name, &self.identity.email)
            .await
            .map_err(PublishError::git("config"))?;
        self.source_control
            .commit(repo, &draft.commit_message)
            .await
            .map_err(PublishError::git("commit"))?;

        // 5. Push
        let remote = Secret::new(coordinates.authenticated_url(cmd.credential.expose_secret()));
        self.source_control
            .push(repo, &remote, branch.as_str())
            .await
            .map_err(PublishError::git("push"))?;
        tracing::info!(branch = %branch, "Branch pushed");

        // 6. Pull request
        let request = PullRequestRequest {
            owner: coordinates.owner.clone(),
            repo: coordinates.name.clone(),
            head: branch.to_string(),
            base: base.clone(),
            title: draft.title,
            body: draft.body,
        };
        let pr_url = self.review_host.open_pull_request(&request).await?;
        tracing::info!(branch = %branch, pr_url = %pr_url, "Pull request opened");

        Ok(PublishedChange {
            branch: branch.into_inner(),
            base,
            pr_url,
        })
    }
}
