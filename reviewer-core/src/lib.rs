pub mod author;
pub mod config;
pub mod defaults;
pub mod eligibility;
pub mod exclusion;
pub mod groups;
pub mod identifier;
pub mod paths;
pub mod pattern;
pub mod pipeline;
pub mod sampling;

pub use author::reviewers_for_author;
pub use config::{AuthorRule, Config, FileRule, Options, DEFAULT_IGNORED_KEYWORD};
pub use defaults::default_reviewers;
pub use eligibility::{check_eligibility, should_request_review, SkipReason};
pub use exclusion::{dedup, exclude, global_excludes};
pub use groups::{other_group_members, resolve_individuals};
pub use identifier::{to_strings, Groups, ReviewerId, TEAM_PREFIX};
pub use paths::reviewers_for_changed_files;
pub use pattern::FilePattern;
pub use pipeline::{collect_candidates, plan, plan_with, Plan, PullRequest};
pub use sampling::{sample, sample_with};
