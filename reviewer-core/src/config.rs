//! Reviewer configuration document.
//!
//! The YAML document is read defensively: a section with the wrong shape is
//! treated as absent and logged, never rejected. Only text that is not YAML at
//! all fails to load.

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

use crate::identifier::{Groups, ReviewerId};
use crate::pattern::FilePattern;

/// Title phrase that suppresses review requests unless configured otherwise.
pub const DEFAULT_IGNORED_KEYWORD: &str = "DO NOT REVIEW";

/// Flags from the `options` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub enable_group_assignment: bool,
    pub ignore_draft: bool,
    pub ignored_keywords: Vec<String>,
    pub exclude: Vec<ReviewerId>,
    pub number_of_reviewers: Option<usize>,
    /// `Some` whenever the key is present, whatever its value. Presence alone
    /// turns on live team reconciliation.
    pub load_github_members: Option<bool>,
    pub force_pick: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            enable_group_assignment: false,
            ignore_draft: true,
            ignored_keywords: vec![DEFAULT_IGNORED_KEYWORD.to_string()],
            exclude: Vec::new(),
            number_of_reviewers: None,
            load_github_members: None,
            force_pick: false,
        }
    }
}

impl Options {
    /// Whether team rosters and requested reviewers are looked up live.
    pub fn loads_github_members(&self) -> bool {
        self.load_github_members.is_some()
    }
}

/// One entry of the `files` section.
#[derive(Debug, Clone)]
pub struct FileRule {
    pub pattern: FilePattern,
    pub reviewers: Vec<ReviewerId>,
}

/// One entry of `reviewers.per_author`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRule {
    /// An individual login or a declared group.
    pub author: ReviewerId,
    pub reviewers: Vec<ReviewerId>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub options: Options,
    pub groups: Groups,
    pub defaults: Option<Vec<ReviewerId>>,
    pub per_author: Option<Vec<AuthorRule>>,
    pub files: Option<Vec<FileRule>>,
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(text).context("Failed to parse reviewer configuration YAML")?;
        Ok(Self::from_value(&document))
    }

    pub fn from_value(document: &Value) -> Self {
        let reviewers = section(document, "reviewers");

        let groups = match reviewers.and_then(|r| section(r, "groups")) {
            Some(value) => parse_groups(value),
            None => {
                info!("No reviewer groups configured");
                Groups::new()
            }
        };

        let classify = |raw: &str| ReviewerId::classify(raw, |name| groups.contains_key(name));
        let classify_all =
            |raw: Vec<String>| raw.iter().map(|r| classify(r.as_str())).collect::<Vec<_>>();

        let defaults = reviewers
            .and_then(|r| section(r, "defaults"))
            .and_then(|value| {
                let list = string_list(value);
                if list.is_none() {
                    warn!("`reviewers.defaults` is not a list, ignoring it");
                }
                list
            })
            .map(|raw| classify_all(raw));

        let per_author = reviewers
            .and_then(|r| mapping_section(r, "reviewers.per_author", "per_author"))
            .map(|mapping| {
                entries(mapping, "reviewers.per_author")
                    .map(|(key, reviewers)| AuthorRule {
                        author: classify(key.as_str()),
                        reviewers: classify_all(reviewers),
                    })
                    .collect()
            });

        let files = mapping_section(document, "files", "files").map(|mapping| {
            entries(mapping, "files")
                .filter_map(|(pattern, reviewers)| match FilePattern::new(&pattern) {
                    Ok(pattern) => Some(FileRule {
                        pattern,
                        reviewers: classify_all(reviewers),
                    }),
                    Err(e) => {
                        warn!("Skipping `files` entry: {:#}", e);
                        None
                    }
                })
                .collect()
        });

        let options = section(document, "options")
            .map(|value| parse_options(value, &classify))
            .unwrap_or_default();

        Config {
            options,
            groups,
            defaults,
            per_author,
            files,
        }
    }
}

fn section<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn mapping_section<'a>(value: &'a Value, path: &str, key: &str) -> Option<&'a Mapping> {
    let found = section(value, key)?;
    let mapping = found.as_mapping();
    if mapping.is_none() {
        warn!("`{}` is not a mapping, ignoring it", path);
    }
    mapping
}

/// Iterate `key: [reviewers]` pairs, skipping malformed entries.
fn entries<'a>(
    mapping: &'a Mapping,
    path: &'a str,
) -> impl Iterator<Item = (String, Vec<String>)> + 'a {
    mapping.iter().filter_map(move |(key, value)| {
        let Some(key) = scalar(key) else {
            warn!("Skipping non-scalar key in `{}`", path);
            return None;
        };
        match string_list(value) {
            Some(list) => Some((key, list)),
            None => {
                warn!("Skipping `{}` entry '{}': value is not a list", path, key);
                None
            }
        }
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A sequence of scalars. Non-scalar items are dropped.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let sequence = value.as_sequence()?;
    Some(sequence.iter().filter_map(scalar).collect())
}

fn parse_groups(value: &Value) -> Groups {
    let Some(mapping) = value.as_mapping() else {
        warn!("`reviewers.groups` is not a mapping, ignoring it");
        return Groups::new();
    };
    entries(mapping, "reviewers.groups")
        .map(|(name, members)| {
            let members = members.iter().map(|m| ReviewerId::member(m)).collect();
            (name, members)
        })
        .collect()
}

fn parse_options(value: &Value, classify: &impl Fn(&str) -> ReviewerId) -> Options {
    let defaults = Options::default();
    if value.as_mapping().is_none() {
        warn!("`options` is not a mapping, using defaults");
        return defaults;
    }

    let flag = |key: &str, default: bool| match section(value, key) {
        None => default,
        Some(v) => v.as_bool().unwrap_or_else(|| {
            warn!("`options.{}` is not a boolean, using {}", key, default);
            default
        }),
    };

    let ignored_keywords = section(value, "ignored_keywords")
        .and_then(string_list)
        .unwrap_or(defaults.ignored_keywords);

    let exclude = section(value, "exclude")
        .and_then(string_list)
        .map(|raw| raw.iter().map(|r| classify(r.as_str())).collect())
        .unwrap_or_default();

    let number_of_reviewers = section(value, "number_of_reviewers").and_then(|v| {
        let count = v.as_u64().and_then(|n| usize::try_from(n).ok());
        if count.is_none() {
            warn!("`options.number_of_reviewers` is not a non-negative integer, ignoring it");
        }
        count
    });

    let load_github_members = value
        .get("load_github_members")
        .map(|v| v.as_bool().unwrap_or(false));

    Options {
        enable_group_assignment: flag("enable_group_assignment", defaults.enable_group_assignment),
        ignore_draft: flag("ignore_draft", defaults.ignore_draft),
        ignored_keywords,
        exclude,
        number_of_reviewers,
        load_github_members,
        force_pick: flag("force_pick", defaults.force_pick),
    }
}
