//! Collaborator abstraction for the GitHub calls the run depends on.
//!
//! The reviewer pipeline only talks to GitHub through `PullRequestApi`.
//! `GitHubClient` implements it over REST; `InMemoryApi` serves canned data
//! for tests.

mod memory;

pub use memory::InMemoryApi;

use anyhow::Result;
use async_trait::async_trait;

/// GitHub operations scoped to the pull request being processed.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Paths of every file changed by the pull request.
    async fn list_changed_files(&self) -> Result<Vec<String>>;

    /// Logins of the members of team `team_slug` in the repository's
    /// organization, or `None` if the team does not exist.
    async fn list_team_members(&self, team_slug: &str) -> Result<Option<Vec<String>>>;

    /// Reviewers already requested on the pull request. Teams are reported
    /// as `team:<slug>`.
    async fn list_requested_reviewers(&self) -> Result<Vec<String>>;

    /// Request reviews. `team:`-prefixed entries are requested as teams.
    async fn assign_reviewers(&self, reviewers: &[String]) -> Result<()>;
}
