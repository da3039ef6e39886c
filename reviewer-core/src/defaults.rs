use tracing::info;

use crate::config::Config;
use crate::exclusion::exclude;
use crate::groups::resolve_individuals;
use crate::identifier::ReviewerId;

/// The `reviewers.defaults` list, group-expanded and filtered by `excludes`.
pub fn default_reviewers(config: &Config, excludes: &[ReviewerId]) -> Vec<ReviewerId> {
    let Some(defaults) = &config.defaults else {
        info!("No default reviewers configured");
        return Vec::new();
    };

    exclude(resolve_individuals(defaults, &config.groups), excludes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ids: &[ReviewerId]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_defaults_expand_groups() {
        let config = Config::from_yaml_str(
            r#"
reviewers:
  groups:
    backend: [bob, carol]
  defaults: [backend]
"#,
        )
        .unwrap();
        assert_eq!(names(&default_reviewers(&config, &[])), vec!["bob", "carol"]);
    }

    #[test]
    fn test_defaults_apply_excludes_after_expansion() {
        let config = Config::from_yaml_str(
            r#"
reviewers:
  groups:
    backend: [bob, carol]
  defaults: [backend, alice, team:infra]
"#,
        )
        .unwrap();
        assert_eq!(
            names(&default_reviewers(&config, &[ReviewerId::individual("carol")])),
            vec!["bob", "alice", "team:infra"]
        );
    }

    #[test]
    fn test_missing_defaults_are_empty() {
        let config = Config::from_yaml_str("reviewers:\n  groups:\n    a: [b]\n").unwrap();
        assert!(default_reviewers(&config, &[]).is_empty());
    }

    #[test]
    fn test_malformed_defaults_are_empty() {
        let config = Config::from_yaml_str("reviewers:\n  defaults:\n    key: value\n").unwrap();
        assert!(default_reviewers(&config, &[]).is_empty());
    }
}
