//! Reviewer identifiers.
//!
//! A reviewer entry in the configuration is plain text, but it can mean three
//! different things: a user login, the name of a group declared under
//! `reviewers.groups`, or a reference to a GitHub team (`team:<slug>`).
//! Entries are classified once, when the configuration is ingested, so later
//! stages match on the variant instead of re-inspecting strings.

use std::collections::BTreeMap;
use std::fmt;

/// Prefix marking a reference to a live GitHub team.
pub const TEAM_PREFIX: &str = "team:";

/// A classified reviewer entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReviewerId {
    /// A single user login.
    Individual(String),
    /// A group declared in `reviewers.groups`, expanded statically.
    Group(String),
    /// A GitHub team slug, resolved against the live roster.
    Team(String),
}

impl ReviewerId {
    pub fn individual(login: impl Into<String>) -> Self {
        Self::Individual(login.into())
    }

    pub fn team(slug: impl Into<String>) -> Self {
        Self::Team(slug.into())
    }

    /// Classify a raw entry. `is_group` decides whether an unprefixed name is
    /// a declared group.
    pub fn classify(raw: &str, is_group: impl Fn(&str) -> bool) -> Self {
        if let Some(slug) = raw.strip_prefix(TEAM_PREFIX) {
            Self::Team(slug.to_string())
        } else if is_group(raw) {
            Self::Group(raw.to_string())
        } else {
            Self::Individual(raw.to_string())
        }
    }

    /// Classify a group member. Members are never groups themselves.
    pub fn member(raw: &str) -> Self {
        Self::classify(raw, |_| false)
    }

    pub fn is_individual(&self, login: &str) -> bool {
        matches!(self, Self::Individual(name) if name == login)
    }

    pub fn as_team(&self) -> Option<&str> {
        match self {
            Self::Team(slug) => Some(slug),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual(login) => write!(f, "{}", login),
            Self::Group(name) => write!(f, "{}", name),
            Self::Team(slug) => write!(f, "{}{}", TEAM_PREFIX, slug),
        }
    }
}

impl From<&str> for ReviewerId {
    fn from(raw: &str) -> Self {
        Self::member(raw)
    }
}

/// Group name to member list, from `reviewers.groups`.
pub type Groups = BTreeMap<String, Vec<ReviewerId>>;

/// Render identifiers in their configuration form (`team:` prefix kept).
pub fn to_strings(ids: &[ReviewerId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}
