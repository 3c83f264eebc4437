//! Wording of the commit and pull request for a change set.

use crate::domain::dependency::UpgradeResult;
use crate::domain::foundation::Timestamp;

/// Title length the hosted API accepts.
pub const MAX_TITLE_CHARS: usize = 256;

const TITLE_PREFIX: &str = "Auto: Upgrade ";
const FALLBACK_SUMMARY: &str = "Auto: Upgrade outdated dependencies";

/// Title, body and commit message describing one set of upgrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub commit_message: String,
}

impl PullRequestDraft {
    pub fn render(results: &[UpgradeResult], created_at: Timestamp) -> Self {
        Self {
            title: render_title(results),
            body: render_body(results, created_at),
            commit_message: render_commit_message(results, created_at),
        }
    }
}

/// Every change as `name: old -> new`, collapsing the tail into
/// `and N more` once the title would exceed the API limit.
fn render_title(results: &[UpgradeResult]) -> String {
    if results.is_empty() {
        return FALLBACK_SUMMARY.to_string();
    }

    let mut title = String::from(TITLE_PREFIX);
    for (i, result) in results.iter().enumerate() {
        let entry = result.to_string();
        let separator = if i == 0 { "" } else { ", " };
        let remaining = results.len() - i;
        let tail = if remaining > 1 {
            format!(" and {} more", remaining - 1)
        } else {
            String::new()
        };

        let fits = title.chars().count() + separator.len() + entry.chars().count() + tail.len()
            <= MAX_TITLE_CHARS;
        if !fits && i > 0 {
            title.push_str(&format!(" and {} more", remaining));
            return title;
        }
        title.push_str(separator);
        title.push_str(&entry);
    }
    title
}

fn render_body(results: &[UpgradeResult], created_at: Timestamp) -> String {
    let mut body = String::from("## Summary\n\n");
    body.push_str("This PR upgrades outdated dependencies to their latest versions.\n\n");
    body.push_str("### Upgraded Packages\n\n");

    if results.is_empty() {
        body.push_str("No packages were upgraded in this update.\n");
    } else {
        body.push_str("| Package | Old Version | New Version |\n");
        body.push_str("|---------|-------------|-------------|\n");
        for r in results {
            body.push_str(&format!(
                "| {} | {} | {} |\n",
                r.package, r.old_version, r.new_version
            ));
        }
        body.push_str("\n### Changes\n\n");
        for r in results {
            body.push_str(&format!("- {}\n", r));
        }
    }

    body.push_str("\n---\n");
    body.push_str(&format!(
        "Created by **Dependency Guardian** on {}\n",
        created_at.as_datetime().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    body
}

fn render_commit_message(results: &[UpgradeResult], created_at: Timestamp) -> String {
    if results.is_empty() {
        return FALLBACK_SUMMARY.to_string();
    }

    let mut message = format!("{FALLBACK_SUMMARY}\n\nChanges:\n");
    for r in results {
        message.push_str(&format!("- {}\n", r));
    }
    message.push_str(&format!(
        "\nCreated by Dependency Guardian on {}",
        created_at.as_datetime().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    message
}
