//! The `pull_request` / `pull_request_target` event payload.

use anyhow::{Context, Result};
use reviewer_core::PullRequest;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequestPayload>,
    pub repository: Repository,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PullRequestPayload {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub draft: bool,
    pub user: User,
    pub head: PullRequestRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PullRequestRef {
    pub sha: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

#[derive(Debug, Deserialize, Clone)]
pub struct User {
    pub login: String,
}

/// What the run needs from the triggering event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub repo_owner: String,
    pub repo_name: String,
    pub pr_number: u64,
    /// The configuration is read at this commit.
    pub head_sha: String,
    pub author: String,
    pub title: String,
    pub is_draft: bool,
}

impl EventContext {
    pub fn from_json(payload: &str) -> Result<Self> {
        let event: EventPayload =
            serde_json::from_str(payload).context("Failed to parse event payload")?;
        let pr = event
            .pull_request
            .context("Event payload has no pull_request; is this a pull_request event?")?;

        Ok(Self {
            repo_owner: event.repository.owner.login,
            repo_name: event.repository.name,
            pr_number: pr.number,
            head_sha: pr.head.sha,
            author: pr.user.login,
            title: pr.title,
            is_draft: pr.draft,
        })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let payload = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event payload from {}", path.display()))?;
        Self::from_json(&payload)
    }

    /// Combine with the changed files into the rule engine's input.
    pub fn pull_request(&self, changed_files: Vec<String>) -> PullRequest {
        PullRequest {
            author: self.author.clone(),
            title: self.title.clone(),
            is_draft: self.is_draft,
            changed_files,
        }
    }
}
