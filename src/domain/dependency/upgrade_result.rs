//! Version changes derived by diffing two manifest states.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::Manifest;

/// One dependency whose declared version changed during an upgrade step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeResult {
    pub package: String,
    pub old_version: String,
    pub new_version: String,
}

impl UpgradeResult {
    pub fn new(
        package: impl Into<String>,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            old_version: old_version.into(),
            new_version: new_version.into(),
        }
    }
}

impl fmt::Display for UpgradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.package, self.old_version, self.new_version)
    }
}

/// Every entry present in both states whose declared version differs.
///
/// Each table is compared on its own, so a change to only the dev entry of a
/// name declared in both tables is still seen. An entry that moved to the
/// other table is followed there. Entries added or removed by the package
/// manager are not upgrades and are left out. A name is reported once, with
/// the runtime table winning when both changed.
pub fn diff_manifests(before: &Manifest, after: &Manifest) -> Vec<UpgradeResult> {
    let mut reported = HashSet::new();
    before
        .entries()
        .filter_map(|(section, name, old)| {
            let new = after.version_in(section, name).or_else(|| {
                before
                    .version_in(section.other(), name)
                    .is_none()
                    .then(|| after.version_in(section.other(), name))
                    .flatten()
            })?;
            (new != old && reported.insert(name)).then(|| UpgradeResult::new(name, old, new))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dependency::DependencySection::{DevDependencies, Dependencies};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn reports_changed_versions_only() {
        let before = Manifest::default()
            .with_entry(Dependencies, "lodash", "4.17.20")
            .with_entry(Dependencies, "axios", "1.6.0");
        let after = Manifest::default()
            .with_entry(Dependencies, "lodash", "4.17.21")
            .with_entry(Dependencies, "axios", "1.6.0");

        assert_eq!(
            diff_manifests(&before, &after),
            vec![UpgradeResult::new("lodash", "4.17.20", "4.17.21")]
        );
    }

    #[test]
    fn picks_up_changes_beyond_the_requested_set() {
        let before = Manifest::default()
            .with_entry(Dependencies, "react", "17.0.2")
            .with_entry(DevDependencies, "@types/react", "17.0.0");
        let after = Manifest::default()
            .with_entry(Dependencies, "react", "18.2.0")
            .with_entry(DevDependencies, "@types/react", "18.2.0");

        let results = diff_manifests(&before, &after);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].package, "@types/react");
    }

    #[test]
    fn ignores_added_and_removed_entries() {
        let before = Manifest::default().with_entry(Dependencies, "request", "2.88.0");
        let after = Manifest::default().with_entry(Dependencies, "undici", "6.0.0");
        assert!(diff_manifests(&before, &after).is_empty());
    }

    #[test]
    fn follows_entry_moved_between_tables() {
        let before = Manifest::default().with_entry(DevDependencies, "vite", "4.0.0");
        let after = Manifest::default().with_entry(Dependencies, "vite", "5.0.0");
        assert_eq!(
            diff_manifests(&before, &after),
            vec![UpgradeResult::new("vite", "4.0.0", "5.0.0")]
        );
    }

    #[test]
    fn sees_dev_only_change_of_a_name_in_both_tables() {
        let before = Manifest::default()
            .with_entry(Dependencies, "typescript", "5.0.0")
            .with_entry(DevDependencies, "typescript", "5.0.0");
        let after = Manifest::default()
            .with_entry(Dependencies, "typescript", "5.0.0")
            .with_entry(DevDependencies, "typescript", "5.4.0");

        assert_eq!(
            diff_manifests(&before, &after),
            vec![UpgradeResult::new("typescript", "5.0.0", "5.4.0")]
        );
    }

    #[test]
    fn name_changed_in_both_tables_is_reported_once() {
        let before = Manifest::default()
            .with_entry(Dependencies, "typescript", "5.0.0")
            .with_entry(DevDependencies, "typescript", "4.9.0");
        let after = Manifest::default()
            .with_entry(Dependencies, "typescript", "5.4.0")
            .with_entry(DevDependencies, "typescript", "5.4.0");

        assert_eq!(
            diff_manifests(&before, &after),
            vec![UpgradeResult::new("typescript", "5.0.0", "5.4.0")]
        );
    }

    #[test]
    fn display_uses_arrow_format() {
        let result = UpgradeResult::new("lodash", "4.17.20", "4.17.21");
        assert_eq!(result.to_string(), "lodash: 4.17.20 -> 4.17.21");
    }

    fn manifest_from(table: &BTreeMap<String, String>) -> Manifest {
        table.iter().fold(Manifest::default(), |m, (n, v)| {
            m.with_entry(Dependencies, n.clone(), v.clone())
        })
    }

    proptest! {
        #[test]
        fn diff_results_match_the_after_state(
            before in prop::collection::btree_map("[a-z]{1,8}", "[0-9]\\.[0-9]\\.[0-9]", 0..12),
            bumps in prop::collection::vec(any::<bool>(), 12),
        ) {
            let mut after = before.clone();
            for ((_, version), bump) in after.iter_mut().zip(bumps.iter()) {
                if *bump {
                    version.push_str("-next");
                }
            }

            let results = diff_manifests(&manifest_from(&before), &manifest_from(&after));

            let bumped = bumps.iter().take(before.len()).filter(|b| **b).count();
            prop_assert_eq!(results.len(), bumped);
            for result in &results {
                prop_assert_eq!(Some(&result.new_version), after.get(&result.package));
                prop_assert_eq!(Some(&result.old_version), before.get(&result.package));
                prop_assert_ne!(&result.old_version, &result.new_version);
            }
        }

        #[test]
        fn identical_states_have_no_diff(
            table in prop::collection::btree_map("[a-z]{1,8}", "[0-9]\\.[0-9]", 0..12),
        ) {
            let manifest = manifest_from(&table);
            prop_assert!(diff_manifests(&manifest, &manifest).is_empty());
        }
    }
}
