//! Filesystem locations

use serde::Deserialize;
use std::path::PathBuf;

/// Where working copies and the memory file live
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Parent directory of the per-cycle working copy
    #[serde(default = "default_working_directory")]
    pub working_directory: PathBuf,

    /// Persisted session memory (JSON)
    #[serde(default = "default_memory_file")]
    pub memory_file: PathBuf,
}

impl PathsConfig {
    /// Working copy location for a repository named `repo_name`
    pub fn working_copy(&self, repo_name: &str) -> PathBuf {
        self.working_directory.join(repo_name)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            working_directory: default_working_directory(),
            memory_file: default_memory_file(),
        }
    }
}

fn default_working_directory() -> PathBuf {
    PathBuf::from("./repos")
}

fn default_memory_file() -> PathBuf {
    PathBuf::from("./memory.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_copy_is_named_after_repository() {
        let config = PathsConfig::default();
        assert_eq!(config.working_copy("widgets"), PathBuf::from("./repos/widgets"));
        assert_eq!(config.memory_file, PathBuf::from("./memory.json"));
    }
}
