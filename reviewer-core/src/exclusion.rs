//! Deduplication and exclusion filters shared by every candidate source.

use std::collections::HashSet;

use crate::config::Config;
use crate::groups::resolve_individuals;
use crate::identifier::ReviewerId;

/// Drop duplicates, keeping the first occurrence of each entry.
pub fn dedup(reviewers: impl IntoIterator<Item = ReviewerId>) -> Vec<ReviewerId> {
    let mut seen = HashSet::new();
    reviewers
        .into_iter()
        .filter(|reviewer| seen.insert(reviewer.clone()))
        .collect()
}

/// Deduplicate `reviewers` and remove everything listed in `excludes`.
pub fn exclude(
    reviewers: impl IntoIterator<Item = ReviewerId>,
    excludes: &[ReviewerId],
) -> Vec<ReviewerId> {
    let excluded: HashSet<&ReviewerId> = excludes.iter().collect();
    dedup(
        reviewers
            .into_iter()
            .filter(|reviewer| !excluded.contains(reviewer)),
    )
}

/// The `options.exclude` list with groups expanded to their members.
pub fn global_excludes(config: &Config) -> Vec<ReviewerId> {
    resolve_individuals(&config.options.exclude, &config.groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ReviewerId> {
        names.iter().map(|name| ReviewerId::from(*name)).collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        assert_eq!(
            dedup(ids(&["bob", "alice", "bob", "carol", "alice"])),
            ids(&["bob", "alice", "carol"])
        );
    }

    #[test]
    fn test_exclude_removes_and_dedups() {
        assert_eq!(
            exclude(ids(&["bob", "alice", "bob", "carol"]), &ids(&["alice"])),
            ids(&["bob", "carol"])
        );
    }

    #[test]
    fn test_exclude_distinguishes_teams_from_logins() {
        let reviewers = vec![ReviewerId::team("infra"), ReviewerId::individual("infra")];
        assert_eq!(
            exclude(reviewers, &[ReviewerId::team("infra")]),
            vec![ReviewerId::individual("infra")]
        );
    }

    #[test]
    fn test_global_excludes_expand_groups() {
        let config = Config::from_yaml_str(
            r#"
reviewers:
  groups:
    backend: [bob, carol]
options:
  exclude: [backend, dan]
"#,
        )
        .unwrap();
        assert_eq!(global_excludes(&config), ids(&["bob", "carol", "dan"]));
    }
}
