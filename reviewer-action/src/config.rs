use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CONFIG_PATH: &str = ".github/auto_request_review.yml";

/// Settings for one invocation, read from the Actions environment.
#[derive(Clone)]
pub struct ActionConfig {
    pub token: String,
    /// Path of the JSON payload of the triggering event.
    pub event_path: PathBuf,
    pub api_url: String,
    /// Path of the reviewer configuration inside the repository.
    pub config_path: String,
    /// Read the reviewer configuration from the checked-out workspace
    /// instead of fetching it at the pull request head.
    pub use_local: bool,
    pub workspace: PathBuf,
    /// Compute reviewers without requesting them.
    pub dry_run: bool,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("token", &"<redacted>")
            .field("event_path", &self.event_path)
            .field("api_url", &self.api_url)
            .field("config_path", &self.config_path)
            .field("use_local", &self.use_local)
            .field("workspace", &self.workspace)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ActionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = non_empty(var("INPUT_TOKEN"))
            .or_else(|| non_empty(var("GITHUB_TOKEN")))
            .context("INPUT_TOKEN or GITHUB_TOKEN environment variable is required")?;

        let event_path = non_empty(var("GITHUB_EVENT_PATH"))
            .map(PathBuf::from)
            .context("GITHUB_EVENT_PATH environment variable is required")?;

        let api_url = non_empty(var("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config_path =
            non_empty(var("INPUT_CONFIG")).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let workspace = non_empty(var("GITHUB_WORKSPACE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(ActionConfig {
            token,
            event_path,
            api_url,
            config_path,
            use_local: parse_flag(var("INPUT_USE_LOCAL")),
            workspace,
            dry_run: parse_flag(var("INPUT_DRY_RUN")),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse a boolean action input. Unset or unrecognised values are false.
pub fn parse_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )
    })
}
