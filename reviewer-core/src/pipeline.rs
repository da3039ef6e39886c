//! The synchronous part of reviewer selection.
//!
//! ```text
//! eligibility -> defaults | files | per_author -> peers -> dedup/exclude -> sample
//! ```
//!
//! Team references are carried through untouched; they are resolved later
//! against live rosters by the caller.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::author::reviewers_for_author;
use crate::config::Config;
use crate::defaults::default_reviewers;
use crate::eligibility::{check_eligibility, SkipReason};
use crate::exclusion::{exclude, global_excludes};
use crate::groups::other_group_members;
use crate::identifier::ReviewerId;
use crate::paths::reviewers_for_changed_files;
use crate::sampling::sample_with;

/// What the pipeline needs to know about a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PullRequest {
    pub author: String,
    pub title: String,
    pub is_draft: bool,
    pub changed_files: Vec<String>,
}

/// Outcome of the synchronous stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No review should be requested.
    Skip(SkipReason),
    /// Candidate reviewers: deduplicated, without groups, without the author.
    Request(Vec<ReviewerId>),
}

impl Plan {
    pub fn reviewers(&self) -> &[ReviewerId] {
        match self {
            Plan::Skip(_) => &[],
            Plan::Request(reviewers) => reviewers,
        }
    }
}

/// Merge every candidate source and apply exclusions. Deterministic; no
/// eligibility check and no sampling.
pub fn collect_candidates(config: &Config, pull_request: &PullRequest) -> Vec<ReviewerId> {
    let author = ReviewerId::individual(pull_request.author.as_str());

    let mut excludes = global_excludes(config);
    excludes.push(author);

    let defaults = default_reviewers(config, &excludes);
    let by_files = reviewers_for_changed_files(
        config.files.as_deref(),
        &config.groups,
        &pull_request.changed_files,
        &excludes,
    );
    let by_author = reviewers_for_author(
        config.per_author.as_deref(),
        &config.groups,
        &pull_request.author,
    );
    let peers = other_group_members(
        &pull_request.author,
        &config.groups,
        config.options.enable_group_assignment,
    );

    let candidates = defaults
        .into_iter()
        .chain(by_files)
        .chain(by_author)
        .chain(peers);

    exclude(candidates, &excludes)
}

pub fn plan(config: &Config, pull_request: &PullRequest) -> Plan {
    plan_with(config, pull_request, &mut rand::thread_rng())
}

pub fn plan_with<R: Rng + ?Sized>(
    config: &Config,
    pull_request: &PullRequest,
    rng: &mut R,
) -> Plan {
    if let Err(reason) = check_eligibility(
        &pull_request.title,
        pull_request.is_draft,
        &config.options,
    ) {
        info!("Skipping review request: {}", reason);
        return Plan::Skip(reason);
    }

    let candidates = collect_candidates(config, pull_request);
    info!("Collected {} candidate reviewers", candidates.len());

    Plan::Request(sample_with(
        candidates,
        config.options.number_of_reviewers,
        rng,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
reviewers:
  defaults: [lead]
  groups:
    backend: [bob, carol, dan]
    docs: [erin, bob]
  per_author:
    backend: [ops]
files:
  "src/**": [backend]
  "*.md": [docs]
options:
  enable_group_assignment: true
  exclude: [dan]
"#;

    fn pr(author: &str, files: &[&str]) -> PullRequest {
        PullRequest {
            author: author.to_string(),
            title: "Improve parser".to_string(),
            is_draft: false,
            changed_files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn names(plan: &Plan) -> Vec<String> {
        plan.reviewers().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_sources_are_unioned() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let plan = plan(&config, &pr("zed", &["src/lib.rs", "README.md"]));
        assert_eq!(names(&plan), vec!["lead", "bob", "carol", "erin"]);
    }

    #[test]
    fn test_author_and_excluded_never_returned() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let plan = plan(&config, &pr("bob", &["src/lib.rs", "README.md"]));
        assert_eq!(names(&plan), vec!["lead", "carol", "erin", "ops"]);
    }

    #[test]
    fn test_draft_is_skipped() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let mut draft = pr("zed", &["src/lib.rs"]);
        draft.is_draft = true;
        assert_eq!(plan(&config, &draft), Plan::Skip(SkipReason::Draft));
    }

    #[test]
    fn test_keyword_is_skipped() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let mut keyword = pr("zed", &["src/lib.rs"]);
        keyword.title = "DO NOT REVIEW: spike".to_string();
        assert!(matches!(
            plan(&config, &keyword),
            Plan::Skip(SkipReason::IgnoredKeyword(_))
        ));
    }

    #[test]
    fn test_sampling_applies_last() {
        let mut config = Config::from_yaml_str(CONFIG).unwrap();
        config.options.number_of_reviewers = Some(2);
        let pull_request = pr("zed", &["src/lib.rs", "README.md"]);
        let full = collect_candidates(&config, &pull_request);
        let picked = plan(&config, &pull_request);
        assert_eq!(picked.reviewers().len(), 2);
        assert!(picked.reviewers().iter().all(|r| full.contains(r)));
    }

    #[test]
    fn test_empty_configuration_requests_nobody() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(
            plan(&config, &pr("zed", &["src/lib.rs"])),
            Plan::Request(Vec::new())
        );
    }
}
