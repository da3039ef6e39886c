use anyhow::Result;
use reviewer_core::{
    exclude, global_excludes, plan, to_strings, Config, Plan, PullRequest, SkipReason,
};
use tracing::info;

use crate::api::PullRequestApi;
use crate::github::GitHubClient;
use crate::reconcile::{remove_already_requested, resolve_teams_and_filter};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The pull request is not eligible for review requests.
    Skipped(SkipReason),
    /// Every stage ran but nobody is left to request.
    NoReviewers,
    /// Reviewers that would have been requested in dry-run mode.
    DryRun(Vec<String>),
    /// Reviewers requested in one call.
    Assigned(Vec<String>),
}

/// Compute the final reviewer set and request it.
///
/// Assignment is a single call made only after every stage succeeded, so a
/// failing lookup never leaves a partial assignment behind.
pub async fn run<A: PullRequestApi + ?Sized>(
    api: &A,
    config: &Config,
    pull_request: &PullRequest,
    dry_run: bool,
) -> Result<Outcome> {
    let candidates = match plan(config, pull_request) {
        Plan::Skip(reason) => return Ok(Outcome::Skipped(reason)),
        Plan::Request(candidates) => candidates,
    };

    let resolved =
        resolve_teams_and_filter(api, candidates, &pull_request.author, &config.options).await?;
    // Team rosters can reintroduce excluded logins.
    let resolved = exclude(resolved, &global_excludes(config));
    let reviewers = remove_already_requested(api, resolved, &config.options).await?;

    if reviewers.is_empty() {
        info!("No reviewers to request");
        return Ok(Outcome::NoReviewers);
    }

    let reviewers = to_strings(&reviewers);
    if dry_run {
        info!("Dry run, would request reviews from: {}", reviewers.join(", "));
        return Ok(Outcome::DryRun(reviewers));
    }

    api.assign_reviewers(&reviewers).await?;
    Ok(Outcome::Assigned(reviewers))
}

/// One full invocation: load the event, the configuration and the changed
/// files, then run the pipeline.
pub async fn execute(client: &GitHubClient) -> Result<Outcome> {
    let context = client.context().await?;

    let config_text = client.fetch_config().await?;
    let config = Config::from_yaml_str(&config_text)?;

    let changed_files = client.list_changed_files().await?;
    let pull_request = context.pull_request(changed_files);

    run(client, &config, &pull_request, client.config().dry_run).await
}
