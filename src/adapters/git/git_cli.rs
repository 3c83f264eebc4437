//! Git CLI Adapter
//!
//! Implements `SourceControl` by shelling out to the `git` binary through
//! the shared `CommandRunner`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::path::Path;

use crate::adapters::process::{CommandOutput, CommandRunner, ProcessError};
use crate::ports::{SourceControl, SourceControlError, StatusEntry};

/// `SourceControl` implementation backed by the git executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    runner: CommandRunner,
}

impl GitCli {
    /// Creates an adapter running `program` (usually `git`).
    ///
    /// Interactive credential prompts are disabled so a bad credential fails
    /// instead of hanging until the timeout.
    pub fn new(program: impl Into<String>, runner: CommandRunner) -> Self {
        Self {
            program: program.into(),
            runner: runner.with_env("GIT_TERMINAL_PROMPT", "0"),
        }
    }

    async fn git(&self, repo: Option<&Path>, args: &[&str]) -> Result<CommandOutput, SourceControlError> {
        let output = self
            .runner
            .run(&self.program, args, repo)
            .await
            .map_err(SourceControlError::from)?;

        if output.success() {
            Ok(output)
        } else {
            Err(SourceControlError::command_failed(
                self.runner.render(&self.program, args),
                output.code,
                output.diagnostics(),
            ))
        }
    }
}

impl From<ProcessError> for SourceControlError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Spawn { command, reason } => Self::Spawn { command, reason },
            ProcessError::Timeout {
                command,
                timeout_secs,
            } => Self::Timeout {
                command,
                timeout_secs,
            },
        }
    }
}

#[async_trait]
impl SourceControl for GitCli {
    async fn clone_repository(
        &self,
        remote: &Secret<String>,
        destination: &Path,
    ) -> Result<(), SourceControlError> {
        let destination = destination.to_string_lossy().into_owned();
        self.git(
            None,
            &["clone", remote.expose_secret().as_str(), destination.as_str()],
        )
        .await?;
        Ok(())
    }

    async fn current_branch(&self, repo: &Path) -> Result<String, SourceControlError> {
        let args = ["rev-parse", "--abbrev-ref", "HEAD"];
        let output = self.git(Some(repo), &args).await?;
        let branch = output.stdout.trim();
        if branch.is_empty() || branch == "HEAD" {
            return Err(SourceControlError::UnexpectedOutput {
                command: self.runner.render(&self.program, &args),
                detail: "no branch checked out".to_string(),
            });
        }
        Ok(branch.to_string())
    }

    async fn status(&self, repo: &Path) -> Result<Vec<StatusEntry>, SourceControlError> {
        let output = self.git(Some(repo), &["status", "--porcelain"]).await?;
        Ok(output.stdout.lines().filter_map(StatusEntry::parse).collect())
    }

    async fn create_branch(&self, repo: &Path, branch: &str) -> Result<(), SourceControlError> {
        self.git(Some(repo), &["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn stage(&self, repo: &Path, paths: &[&str]) -> Result<(), SourceControlError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend_from_slice(paths);
        self.git(Some(repo), &args).await?;
        Ok(())
    }

    async fn configure_identity(
        &self,
        repo: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), SourceControlError> {
        self.git(Some(repo), &["config", "user.name", name]).await?;
        self.git(Some(repo), &["config", "user.email", email]).await?;
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), SourceControlError> {
        self.git(Some(repo), &["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push(
        &self,
        repo: &Path,
        remote: &Secret<String>,
        branch: &str,
    ) -> Result<(), SourceControlError> {
        self.git(
            Some(repo),
            &["remote", "set-url", "origin", remote.expose_secret().as_str()],
        )
        .await?;
        self.git(Some(repo), &["push", "-u", "origin", branch]).await?;
        Ok(())
    }
}
