//! Read-only view over the dependency manifest (`package.json`).

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// File name of the manifest inside a working copy.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// File name of the lock file that travels with the manifest.
pub const LOCK_FILE_NAME: &str = "package-lock.json";

/// Which declaration table an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    pub fn other(self) -> Self {
        match self {
            DependencySection::Dependencies => DependencySection::DevDependencies,
            DependencySection::DevDependencies => DependencySection::Dependencies,
        }
    }
}

/// The manifest bytes did not describe a usable manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Malformed(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

/// Declared dependency versions, split by section.
///
/// Only the two tables the upgrade flow touches are modelled; every other
/// manifest field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Parses manifest bytes as read from disk.
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let raw: RawManifest =
            serde_json::from_slice(bytes).map_err(|e| ManifestError::Malformed(e.to_string()))?;
        Ok(Self {
            dependencies: raw.dependencies,
            dev_dependencies: raw.dev_dependencies,
        })
    }

    /// Builder used by tests and fakes.
    pub fn with_entry(
        mut self,
        section: DependencySection,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let table = match section {
            DependencySection::Dependencies => &mut self.dependencies,
            DependencySection::DevDependencies => &mut self.dev_dependencies,
        };
        table.insert(name.into(), version.into());
        self
    }

    /// Declared version of `name`, looking at runtime dependencies first.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }

    /// Declared version of `name` in one specific table.
    pub fn version_in(&self, section: DependencySection, name: &str) -> Option<&str> {
        let table = match section {
            DependencySection::Dependencies => &self.dependencies,
            DependencySection::DevDependencies => &self.dev_dependencies,
        };
        table.get(name).map(String::as_str)
    }

    /// All entries, runtime dependencies first, each table in name order.
    pub fn entries(&self) -> impl Iterator<Item = (DependencySection, &str, &str)> {
        let deps = self
            .dependencies
            .iter()
            .map(|(n, v)| (DependencySection::Dependencies, n.as_str(), v.as_str()));
        let dev = self
            .dev_dependencies
            .iter()
            .map(|(n, v)| (DependencySection::DevDependencies, n.as_str(), v.as_str()));
        deps.chain(dev)
    }

    /// Number of declared entries across both tables.
    pub fn len(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
