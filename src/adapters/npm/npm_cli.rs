//! npm CLI Adapter
//!
//! Implements `PackageManager` by running `npm` inside the working copy.

use async_trait::async_trait;
use std::path::Path;

use crate::adapters::process::{CommandOutput, CommandRunner, ProcessError};
use crate::ports::{PackageManager, PackageManagerError};

const LEGACY_PEER_DEPS: &str = "--legacy-peer-deps";

/// `PackageManager` implementation backed by the npm executable.
#[derive(Debug, Clone)]
pub struct NpmCli {
    program: String,
    runner: CommandRunner,
}

impl NpmCli {
    pub fn new(program: impl Into<String>, runner: CommandRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    async fn npm(&self, project: &Path, args: &[&str]) -> Result<CommandOutput, PackageManagerError> {
        self.runner
            .run(&self.program, args, Some(project))
            .await
            .map_err(PackageManagerError::from)
    }

    fn failure(&self, args: &[&str], output: &CommandOutput) -> PackageManagerError {
        PackageManagerError::command_failed(
            self.runner.render(&self.program, args),
            output.code,
            output.diagnostics(),
        )
    }
}

impl From<ProcessError> for PackageManagerError {
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

/// `npm ls` exits non-zero for missing optional or peer dependencies too;
/// those are tolerated, anything else is not.
fn only_tolerable_problems(diagnostics: &str) -> bool {
    let problems: Vec<String> = diagnostics
        .lines()
        .map(str::to_lowercase)
        .filter(|line| line.contains("err") || line.contains("invalid") || line.contains("unmet"))
        .filter(|line| !line.contains("code elsproblems") && !line.contains("complete log"))
        .collect();

    !problems.is_empty()
        && problems
            .iter()
            .all(|line| line.contains("missing") || line.contains("peer"))
}

fn is_safe_package_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.chars().any(char::is_whitespace)
}

#[async_trait]
impl PackageManager for NpmCli {
    async fn install(&self, project: &Path) -> Result<(), PackageManagerError> {
        let args = ["install", LEGACY_PEER_DEPS];
        let output = self.npm(project, &args).await?;
        if output.success() {
            Ok(())
        } else {
            Err(self.failure(&args, &output))
        }
    }

    async fn outdated_report(&self, project: &Path) -> Result<String, PackageManagerError> {
        let args = ["outdated", "--json"];
        let output = self.npm(project, &args).await?;
        // Exit code 1 means "some packages are outdated".
        match output.code {
            Some(0) | Some(1) => Ok(output.stdout),
            _ => Err(self.failure(&args, &output)),
        }
    }

    async fn install_latest(
        &self,
        project: &Path,
        package: &str,
    ) -> Result<(), PackageManagerError> {
        let spec = format!("{package}@latest");
        let args = ["install", spec.as_str(), "--save", LEGACY_PEER_DEPS];
        if !is_safe_package_name(package) {
            return Err(PackageManagerError::command_failed(
                self.runner.render(&self.program, &args),
                None,
                format!("refusing to install suspicious package name '{package}'"),
            ));
        }

        let output = self.npm(project, &args).await?;
        if output.success() {
            Ok(())
        } else {
            Err(self.failure(&args, &output))
        }
    }

    async fn verify(&self, project: &Path) -> Result<(), PackageManagerError> {
        let output = self.npm(project, &["ls", "--depth=0"]).await?;
        if output.success() {
            return Ok(());
        }

        let combined = format!("{}\n{}", output.stderr, output.stdout);
        if only_tolerable_problems(&combined) {
            tracing::warn!(
                diagnostics = %output.diagnostics(),
                "Dependency tree has missing or peer dependency complaints, accepting"
            );
            Ok(())
        } else {
            Err(PackageManagerError::VerificationFailed(
                output.diagnostics().to_string(),
            ))
        }
    }
}
