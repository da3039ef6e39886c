use anyhow::Result;
use tracing::{error, info, Level};

use reviewer_action::{execute, ActionConfig, GitHubClient, Outcome};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!(
        "Starting auto-request-review {}",
        reviewer_action::get_action_version()
    );

    let config = ActionConfig::from_env()?;
    let client = GitHubClient::new(config)?;

    match execute(&client).await {
        Ok(Outcome::Skipped(reason)) => info!("Not requesting reviews: {}", reason),
        Ok(Outcome::NoReviewers) => info!("No reviewers matched this pull request"),
        Ok(Outcome::DryRun(reviewers)) => {
            info!("Dry run complete, would request: {}", reviewers.join(", "))
        }
        Ok(Outcome::Assigned(reviewers)) => {
            info!("Requested reviews from: {}", reviewers.join(", "))
        }
        Err(e) => {
            error!("Failed to request reviewers: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
