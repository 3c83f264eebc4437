//! Outdated package records parsed from the package manager's JSON report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Placeholder used when the report omits a version column.
const UNKNOWN_VERSION: &str = "N/A";

/// A dependency whose installed version is behind the latest available one.
///
/// Produced fresh by every scan and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedPackage {
    pub name: String,
    pub current_version: String,
    pub wanted_version: String,
    pub latest_version: String,
}

impl OutdatedPackage {
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        wanted_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            wanted_version: wanted_version.into(),
            latest_version: latest_version.into(),
        }
    }
}

impl fmt::Display for OutdatedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.name, self.current_version, self.latest_version
        )
    }
}

/// The report could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutdatedReportError {
    #[error("report is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("report must be a JSON object keyed by package name")]
    NotAnObject,

    #[error("entry for '{package}' is malformed")]
    MalformedEntry { package: String },

    /// The package manager wrote its own error object instead of a report.
    #[error("package manager reported {code}: {summary}")]
    Reported { code: String, summary: String },
}

#[derive(Debug, Deserialize)]
struct ReportEntry {
    current: Option<String>,
    wanted: Option<String>,
    latest: Option<String>,
}

impl ReportEntry {
    fn has_versions(&self) -> bool {
        self.current.is_some() || self.wanted.is_some() || self.latest.is_some()
    }
}

/// `{"error": {"code": .., "summary": ..}}`, printed on registry failures.
#[derive(Debug, Deserialize)]
struct ReportedFailure {
    code: Option<String>,
    summary: Option<String>,
}

fn reported_failure(entries: &serde_json::Map<String, Value>) -> Option<OutdatedReportError> {
    let failure: ReportedFailure = serde_json::from_value(entries.get("error")?.clone()).ok()?;
    if failure.code.is_none() && failure.summary.is_none() {
        return None;
    }
    Some(OutdatedReportError::Reported {
        code: failure.code.unwrap_or_else(|| "unknown".to_string()),
        summary: failure.summary.unwrap_or_default(),
    })
}

/// Parses the `outdated --json` report into ordered records.
///
/// Blank output and `{}` both mean "nothing is outdated". When a package is
/// listed once per dependent (an array of entries), the first entry wins.
/// Records come back in the report's key order, which `serde_json` yields
/// sorted by package name. An error object from the package manager, or an
/// entry without any version column, is rejected rather than read as a
/// package.
pub fn parse_outdated_report(raw: &str) -> Result<Vec<OutdatedPackage>, OutdatedReportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| OutdatedReportError::InvalidJson(e.to_string()))?;

    let Value::Object(entries) = value else {
        return Err(OutdatedReportError::NotAnObject);
    };
    if let Some(failure) = reported_failure(&entries) {
        return Err(failure);
    }

    let mut packages = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        let entry = match entry {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };

        let parsed: ReportEntry = serde_json::from_value(entry).map_err(|_| {
            OutdatedReportError::MalformedEntry {
                package: name.clone(),
            }
        })?;
        if !parsed.has_versions() {
            return Err(OutdatedReportError::MalformedEntry { package: name });
        }

        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        packages.push(OutdatedPackage {
            current_version: or_unknown(parsed.current),
            wanted_version: or_unknown(parsed.wanted),
            latest_version: or_unknown(parsed.latest),
            name,
        });
    }

    Ok(packages)
}
