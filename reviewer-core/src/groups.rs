//! Static group expansion from `reviewers.groups`.

use tracing::debug;

use crate::exclusion::dedup;
use crate::identifier::{Groups, ReviewerId};

/// Replace every group reference with the group's members.
///
/// Expansion is one level deep; members are never groups themselves.
pub fn resolve_individuals(ids: &[ReviewerId], groups: &Groups) -> Vec<ReviewerId> {
    ids.iter()
        .flat_map(|id| match id {
            ReviewerId::Group(name) => match groups.get(name) {
                Some(members) => members.clone(),
                None => {
                    debug!("Group '{}' is not declared, dropping it", name);
                    Vec::new()
                }
            },
            other => vec![other.clone()],
        })
        .collect()
}

/// Whether `author` is listed as a member of group `name`.
pub fn is_member(author: &str, name: &str, groups: &Groups) -> bool {
    groups
        .get(name)
        .is_some_and(|members| members.iter().any(|m| m.is_individual(author)))
}

/// Names of every group listing `author` as a member.
pub fn groups_of<'a>(author: &'a str, groups: &'a Groups) -> impl Iterator<Item = &'a str> + 'a {
    groups
        .iter()
        .filter(move |(_, members)| members.iter().any(|m| m.is_individual(author)))
        .map(|(name, _)| name.as_str())
}

/// The other members of every group the author belongs to.
///
/// Empty unless `enable_group_assignment` is set.
pub fn other_group_members(
    author: &str,
    groups: &Groups,
    enable_group_assignment: bool,
) -> Vec<ReviewerId> {
    if !enable_group_assignment {
        return Vec::new();
    }

    let peers = groups_of(author, groups)
        .filter_map(|name| groups.get(name))
        .flatten()
        .filter(|member| !member.is_individual(author))
        .cloned();

    dedup(peers)
}
