use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reviewer_core::TEAM_PREFIX;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::api::PullRequestApi;
use crate::config::ActionConfig;
use crate::event::EventContext;
use crate::middleware::TracingMiddleware;

const PER_PAGE: usize = 100;

/// GitHub REST client bound to the pull request of the current run.
///
/// The event context is read from `GITHUB_EVENT_PATH` on first use and kept
/// for the lifetime of the client; `reset` forgets it.
#[derive(Clone)]
pub struct GitHubClient {
    client: ClientWithMiddleware,
    config: ActionConfig,
    context: Arc<RwLock<Option<Arc<EventContext>>>>,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct RequestedReviewersResponse {
    #[serde(default)]
    users: Vec<Account>,
    #[serde(default)]
    teams: Vec<TeamRef>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
}

/// Body of `POST /pulls/{n}/requested_reviewers`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReviewRequest {
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
}

impl ReviewRequest {
    /// Route `team:`-prefixed entries to `team_reviewers`.
    pub fn from_reviewers(reviewers: &[String]) -> Self {
        let (teams, users): (Vec<&String>, Vec<&String>) = reviewers
            .iter()
            .partition(|reviewer| reviewer.starts_with(TEAM_PREFIX));

        Self {
            reviewers: users.into_iter().cloned().collect(),
            team_reviewers: teams
                .into_iter()
                .map(|team| team[TEAM_PREFIX.len()..].to_string())
                .collect(),
        }
    }
}

impl GitHubClient {
    pub fn new(config: ActionConfig) -> Result<Self> {
        Ok(Self {
            client: create_github_client()?,
            config,
            context: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// The triggering pull request, loaded once and then memoized.
    pub async fn context(&self) -> Result<Arc<EventContext>> {
        {
            let cached = self.context.read().await;
            if let Some(context) = cached.as_ref() {
                return Ok(context.clone());
            }
        }

        let loaded = Arc::new(EventContext::load(&self.config.event_path).await?);
        info!(
            "Loaded pull request #{} in {}/{} by {}",
            loaded.pr_number, loaded.repo_owner, loaded.repo_name, loaded.author
        );

        let mut cached = self.context.write().await;
        Ok(cached.get_or_insert(loaded).clone())
    }

    /// Forget the memoized event context.
    pub async fn reset(&self) {
        self.context.write().await.take();
    }

    /// Raw text of the reviewer configuration file.
    pub async fn fetch_config(&self) -> Result<String> {
        if self.config.use_local {
            let path = self.config.workspace.join(&self.config.config_path);
            info!("Reading reviewer configuration from {}", path.display());
            return tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        let context = self.context().await?;
        let url = self.repo_url(&context, &format!("contents/{}", self.config.config_path));

        info!(
            "Fetching reviewer configuration {} at {}",
            self.config.config_path, context.head_sha
        );

        let response = self
            .get(&url)
            .query(&[("ref", context.head_sha.as_str())])
            .send()
            .await
            .context("Failed to send configuration request")?;
        let response = error_for_status(response, "fetching configuration").await?;

        let contents: ContentsResponse = response
            .json()
            .await
            .context("Failed to parse configuration contents response")?;

        let decoded = general_purpose::STANDARD
            .decode(contents.content.replace('\n', ""))
            .context("Failed to decode base64 configuration content")?;
        String::from_utf8(decoded).context("Configuration file is not valid UTF-8")
    }

    fn repo_url(&self, context: &EventContext, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url, context.repo_owner, context.repo_name, path
        )
    }

    fn pull_url(&self, context: &EventContext, path: &str) -> String {
        self.repo_url(context, &format!("pulls/{}/{}", context.pr_number, path))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "application/vnd.github.v3+json")
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.authorized(self.client.get(url))
    }

    /// Follow `page` numbers until a short page. `None` if the first page is
    /// a 404.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<Option<Vec<T>>> {
        let mut all_items = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .get(url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await
                .with_context(|| format!("Failed to send request {}", what))?;

            if page == 1 && response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let response = error_for_status(response, what).await?;
            let items: Vec<T> = response
                .json()
                .await
                .with_context(|| format!("Failed to parse response {}", what))?;

            let items_count = items.len();
            all_items.extend(items);
            if items_count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(Some(all_items))
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    async fn list_changed_files(&self) -> Result<Vec<String>> {
        let context = self.context().await?;
        let url = self.pull_url(&context, "files");

        let files: Vec<ChangedFile> = self
            .get_all_pages(&url, "listing changed files")
            .await?
            .with_context(|| format!("Pull request #{} not found", context.pr_number))?;

        info!("Pull request #{} changes {} files", context.pr_number, files.len());
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn list_team_members(&self, team_slug: &str) -> Result<Option<Vec<String>>> {
        if !is_valid_team_slug(team_slug) {
            warn!("'{}' is not a valid team slug, not looking it up", team_slug);
            return Ok(None);
        }

        let context = self.context().await?;
        let url = format!(
            "{}/orgs/{}/teams/{}/members",
            self.config.api_url, context.repo_owner, team_slug
        );

        let members: Option<Vec<Account>> = self
            .get_all_pages(&url, &format!("listing members of team {}", team_slug))
            .await?;

        Ok(members.map(|members| members.into_iter().map(|m| m.login).collect()))
    }

    async fn list_requested_reviewers(&self) -> Result<Vec<String>> {
        let context = self.context().await?;
        let url = self.pull_url(&context, "requested_reviewers");

        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to send requested reviewers request")?;
        let response = error_for_status(response, "listing requested reviewers").await?;

        let requested: RequestedReviewersResponse = response
            .json()
            .await
            .context("Failed to parse requested reviewers response")?;

        Ok(requested
            .users
            .into_iter()
            .map(|user| user.login)
            .chain(
                requested
                    .teams
                    .into_iter()
                    .map(|team| format!("{}{}", TEAM_PREFIX, team.slug)),
            )
            .collect())
    }

    async fn assign_reviewers(&self, reviewers: &[String]) -> Result<()> {
        let context = self.context().await?;
        let url = self.pull_url(&context, "requested_reviewers");
        let request_body = ReviewRequest::from_reviewers(reviewers);

        info!(
            "Requesting reviews on PR #{} from users {:?} and teams {:?}",
            context.pr_number, request_body.reviewers, request_body.team_reviewers
        );

        let response = self
            .authorized(self.client.post(&url))
            .body(serde_json::to_string(&request_body)?)
            .header("Content-Type", "application/json")
            .send()
            .await
            .context("Failed to send review request")?;
        error_for_status(response, "requesting reviewers").await?;

        info!("Successfully requested {} reviewers", reviewers.len());
        Ok(())
    }
}

/// Team slugs are interpolated into the URL path, so only the characters
/// GitHub produces for slugs are accepted.
pub fn is_valid_team_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

async fn error_for_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response
        .text()
        .await
        .context("Failed to read error response body")?;
    error!("GitHub API error {}: {} - {}", what, status, error_text);
    Err(anyhow!("GitHub API error {}: {} - {}", what, status, error_text))
}

pub fn create_github_client() -> Result<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(format!(
            "auto-request-review/{}",
            crate::get_action_version()
        ))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ClientBuilder::new(client).with(TracingMiddleware).build())
}
