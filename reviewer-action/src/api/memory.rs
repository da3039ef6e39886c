//! In-memory implementation of `PullRequestApi`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::{Barrier, RwLock};

use super::PullRequestApi;

/// Canned GitHub data. Lookups and assignments are recorded so callers can
/// assert on them.
#[derive(Default)]
pub struct InMemoryApi {
    changed_files: Vec<String>,
    teams: HashMap<String, Vec<String>>,
    failing_teams: HashSet<String>,
    requested: Vec<String>,
    lookup_barrier: Option<Arc<Barrier>>,
    team_lookups: RwLock<Vec<String>>,
    assignments: RwLock<Vec<Vec<String>>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_changed_files<S: Into<String>>(mut self, files: impl IntoIterator<Item = S>) -> Self {
        self.changed_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_team<S: Into<String>>(
        mut self,
        slug: &str,
        members: impl IntoIterator<Item = S>,
    ) -> Self {
        self.teams
            .insert(slug.to_string(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Make lookups of `slug` fail with a transport-style error.
    pub fn with_failing_team(mut self, slug: &str) -> Self {
        self.failing_teams.insert(slug.to_string());
        self
    }

    pub fn with_requested<S: Into<String>>(mut self, requested: impl IntoIterator<Item = S>) -> Self {
        self.requested = requested.into_iter().map(Into::into).collect();
        self
    }

    /// Hold every team lookup at `barrier` until enough lookups are in
    /// flight to release it.
    pub fn with_lookup_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.lookup_barrier = Some(barrier);
        self
    }

    /// Team slugs looked up so far, in call order.
    pub async fn team_lookups(&self) -> Vec<String> {
        self.team_lookups.read().await.clone()
    }

    /// Every `assign_reviewers` call so far.
    pub async fn assignments(&self) -> Vec<Vec<String>> {
        self.assignments.read().await.clone()
    }
}

#[async_trait]
impl PullRequestApi for InMemoryApi {
    async fn list_changed_files(&self) -> Result<Vec<String>> {
        Ok(self.changed_files.clone())
    }

    async fn list_team_members(&self, team_slug: &str) -> Result<Option<Vec<String>>> {
        self.team_lookups.write().await.push(team_slug.to_string());
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }
        if self.failing_teams.contains(team_slug) {
            return Err(anyhow!("GitHub API error: 502 Bad Gateway"));
        }
        Ok(self.teams.get(team_slug).cloned())
    }

    async fn list_requested_reviewers(&self) -> Result<Vec<String>> {
        Ok(self.requested.clone())
    }

    async fn assign_reviewers(&self, reviewers: &[String]) -> Result<()> {
        self.assignments.write().await.push(reviewers.to_vec());
        Ok(())
    }
}
