//! Process Runner
//!
//! Shared `tokio::process` plumbing for the command-line adapters: spawns a
//! program in a directory, captures its output, enforces a timeout and keeps
//! credentials out of anything that may be logged.

use secrecy::{ExposeSecret, Secret};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stderr, falling back to stdout when stderr is empty.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Failures before a command produced an exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    Spawn { command: String, reason: String },
    Timeout { command: String, timeout_secs: u64 },
}

/// Runs external programs with a uniform timeout and redaction policy.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
    env: Vec<(String, String)>,
    secrets: Vec<Secret<String>>,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            env: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Sets an environment variable for every spawned command.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Registers a secret to mask in rendered command lines and output.
    pub fn redacting(mut self, secret: Secret<String>) -> Self {
        if !secret.expose_secret().is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Masks every registered secret in `text`.
    pub fn redact(&self, text: &str) -> String {
        self.secrets.iter().fold(text.to_string(), |acc, secret| {
            acc.replace(secret.expose_secret().as_str(), "***")
        })
    }

    /// Command line as it may appear in logs and errors.
    pub fn render(&self, program: &str, args: &[&str]) -> String {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.redact(&line)
    }

    /// Runs `program args` in `cwd` and waits for it to finish.
    ///
    /// A non-zero exit is not an error here; callers decide which codes they
    /// accept. The child is killed if the timeout elapses.
    pub async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, ProcessError> {
        let rendered = self.render(program, args);
        tracing::debug!(command = %rendered, cwd = ?cwd, "Running command");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProcessError::Spawn {
                    command: rendered,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(command = %rendered, timeout_secs = self.timeout.as_secs(), "Command timed out");
                return Err(ProcessError::Timeout {
                    command: rendered,
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let result = CommandOutput {
            code: output.status.code(),
            stdout: self.redact(&String::from_utf8_lossy(&output.stdout)),
            stderr: self.redact(&String::from_utf8_lossy(&output.stderr)),
        };
        tracing::debug!(command = %rendered, code = ?result.code, "Command finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> CommandRunner {
        CommandRunner::new(Duration::from_secs(5))
            .redacting(Secret::new("ghp_secret".to_string()))
    }

    #[test]
    fn render_masks_registered_secrets() {
        let line = runner().render(
            "git",
            &["clone", "https://ghp_secret@github.com/acme/widgets.git", "dest"],
        );
        assert_eq!(line, "git clone https://***@github.com/acme/widgets.git dest");
    }

    #[test]
    fn empty_secrets_are_ignored() {
        let runner = CommandRunner::new(Duration::from_secs(1)).redacting(Secret::new(String::new()));
        assert_eq!(runner.redact("abc"), "abc");
    }

    #[test]
    fn diagnostics_prefers_stderr() {
        let output = CommandOutput {
            code: Some(1),
            stdout: "out".to_string(),
            stderr: "err\n".to_string(),
        };
        assert_eq!(output.diagnostics(), "err");

        let quiet = CommandOutput {
            code: Some(1),
            stdout: "only out".to_string(),
            stderr: "  ".to_string(),
        };
        assert_eq!(quiet.diagnostics(), "only out");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let output = runner()
            .run("sh", &["-c", "echo ghp_secret; exit 3"], None)
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "***");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn times_out_long_commands() {
        let runner = CommandRunner::new(Duration::from_millis(100));
        let result = runner.run("sleep", &["5"], None).await;
        assert!(matches!(result, Err(ProcessError::Timeout { .. })));
    }

    #[tokio::test]
    async fn reports_missing_programs_as_spawn_errors() {
        let result = runner()
            .run("definitely-not-a-real-program-xyz", &[], None)
            .await;
        assert!(matches!(result, Err(ProcessError::Spawn { .. })));
    }
}
