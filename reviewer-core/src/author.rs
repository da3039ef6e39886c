use tracing::{debug, info};

use crate::config::AuthorRule;
use crate::exclusion::exclude;
use crate::groups::{is_member, resolve_individuals};
use crate::identifier::{Groups, ReviewerId};

/// Whether a `per_author` key applies to `author`: either it names the
/// author, or it names a group the author belongs to.
pub fn rule_applies(key: &ReviewerId, author: &str, groups: &Groups) -> bool {
    match key {
        ReviewerId::Individual(login) => login == author,
        ReviewerId::Group(name) => is_member(author, name, groups),
        ReviewerId::Team(slug) => {
            debug!("per_author key 'team:{}' cannot be matched statically", slug);
            false
        }
    }
}

/// Reviewers configured for the pull request author, never including the
/// author themselves.
pub fn reviewers_for_author(
    per_author: Option<&[AuthorRule]>,
    groups: &Groups,
    author: &str,
) -> Vec<ReviewerId> {
    let Some(rules) = per_author else {
        info!("No author-based reviewers configured");
        return Vec::new();
    };

    let matched: Vec<ReviewerId> = rules
        .iter()
        .filter(|rule| rule_applies(&rule.author, author, groups))
        .flat_map(|rule| rule.reviewers.iter().cloned())
        .collect();

    exclude(
        resolve_individuals(&matched, groups),
        &[ReviewerId::individual(author)],
    )
}
