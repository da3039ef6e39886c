use tracing::{debug, info};

use crate::config::FileRule;
use crate::exclusion::exclude;
use crate::groups::resolve_individuals;
use crate::identifier::{Groups, ReviewerId};

/// Reviewers of every `files` pattern matched by at least one changed file.
///
/// A pattern contributes all of its reviewers as soon as any changed file
/// matches it; patterns are evaluated independently.
pub fn reviewers_for_changed_files<S: AsRef<str>>(
    files: Option<&[FileRule]>,
    groups: &Groups,
    changed_files: &[S],
    excludes: &[ReviewerId],
) -> Vec<ReviewerId> {
    let Some(rules) = files else {
        info!("No file-based reviewers configured");
        return Vec::new();
    };

    let matched: Vec<ReviewerId> = rules
        .iter()
        .filter(|rule| {
            let hit = rule.pattern.matches_any(changed_files);
            if hit {
                debug!("Changed files match pattern '{}'", rule.pattern.as_str());
            }
            hit
        })
        .flat_map(|rule| rule.reviewers.iter().cloned())
        .collect();

    exclude(resolve_individuals(&matched, groups), excludes)
}
