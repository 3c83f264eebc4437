//! Application configuration module
//!
//! This module provides type-safe configuration loading from a YAML file
//! layered with environment variables, using the `config` and `dotenvy`
//! crates. Environment variables use the `GUARDIAN` prefix and nested values
//! are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use dependency_guardian::config::AppConfig;
//!
//! let config = AppConfig::load("config.yaml").expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Watching {}", config.github.repo_url);
//! ```

mod agent;
mod commands;
mod error;
mod github;
mod logging;
mod paths;

pub use agent::AgentConfig;
pub use commands::CommandsConfig;
pub use error::{ConfigError, ValidationError};
pub use github::GithubConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use paths::PathsConfig;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root application configuration
///
/// Load using [`AppConfig::load()`], which reads the YAML file and then
/// applies environment overrides.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Monitored repository and credential
    #[serde(default)]
    pub github: GithubConfig,

    /// Cycle interval, branch naming and commit identity
    #[serde(default)]
    pub agent: AgentConfig,

    /// Working directory and memory file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// External tools and their timeout
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Log output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `path` and the environment
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the YAML file at `path` (must exist)
    /// 3. Applies environment variables with `GUARDIAN` prefix, using `__`
    ///    (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GUARDIAN__GITHUB__TOKEN=...` -> `github.token = ...`
    /// - `GUARDIAN__AGENT__CHECK_INTERVAL_SECS=60` -> `agent.check_interval_secs = 60`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or values cannot be
    /// parsed into expected types. Empty credentials are not a load error;
    /// see [`AppConfig::validate()`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            .add_source(
                config::Environment::with_prefix("GUARDIAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Run at startup and again before every cycle.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.github.validate()?;
        self.agent.validate()?;
        self.commands.validate()?;
        Ok(())
    }

    /// Working copy path for the configured repository
    pub fn working_copy_path(&self) -> Option<PathBuf> {
        self.github
            .coordinates()
            .map(|coords| self.paths.working_copy(&coords.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const FULL_YAML: &str = r#"
github:
  repo_url: https://github.com/acme/widgets
  token: ghp_from_file
agent:
  check_interval_secs: 120
  branch_prefix: deps/update
paths:
  working_directory: /tmp/guardian/repos
  memory_file: /tmp/guardian/memory.json
logging:
  format: json
"#;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn clear_env() {
        env::remove_var("GUARDIAN__GITHUB__TOKEN");
        env::remove_var("GUARDIAN__AGENT__CHECK_INTERVAL_SECS");
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, FULL_YAML);

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.github.repo_url, "https://github.com/acme/widgets");
        assert_eq!(config.github.token, "ghp_from_file");
        assert_eq!(config.agent.check_interval_secs, 120);
        assert_eq!(config.agent.branch_prefix, "deps/update");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.working_copy_path(),
            Some(PathBuf::from("/tmp/guardian/repos/widgets"))
        );
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "github:\n  repo_url: https://github.com/acme/widgets\n");

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.agent.check_interval_secs, 3600);
        assert_eq!(config.agent.branch_prefix, "auto/dependency-update");
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.commands.timeout_secs, 600);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.github.base_branch.is_none());
    }

    #[test]
    fn test_placeholder_credentials_load_but_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "github:\n  repo_url: https://github.com/acme/widgets\n  token: \"\"\n",
        );

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("github.token"))
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, FULL_YAML);
        env::set_var("GUARDIAN__GITHUB__TOKEN", "ghp_from_env");
        env::set_var("GUARDIAN__AGENT__CHECK_INTERVAL_SECS", "30");
        let result = AppConfig::load(&path);
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.github.token, "ghp_from_env");
        assert_eq!(config.agent.check_interval_secs, 30);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new().unwrap();

        let result = AppConfig::load(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_default_config_is_invalid() {
        assert_eq!(
            AppConfig::default().validate(),
            Err(ValidationError::MissingRequired("github.repo_url"))
        );
    }
}
