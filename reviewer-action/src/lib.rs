pub mod api;
pub mod config;
pub mod event;
pub mod github;
pub mod middleware;
pub mod reconcile;
pub mod run;

pub use api::{InMemoryApi, PullRequestApi};
pub use config::ActionConfig;
pub use event::EventContext;
pub use github::{GitHubClient, ReviewRequest};
pub use reconcile::{remove_already_requested, resolve_teams_and_filter};
pub use run::{execute, run, Outcome};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub fn get_action_version() -> String {
    let git_hash = option_env!("AUTO_REQUEST_REVIEW_GIT_HASH").or(built_info::GIT_COMMIT_HASH);
    match git_hash {
        Some(hash) => format!("{}+{}", built_info::PKG_VERSION, &hash[..8.min(hash.len())]),
        None => built_info::PKG_VERSION.to_string(),
    }
}
