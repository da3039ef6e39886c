use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reviewer_core::{collect_candidates, plan, to_strings, Config, Plan, PullRequest};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Offline evaluation of an auto-request-review configuration
#[derive(Parser, Debug)]
#[command(name = "reviewer")]
#[command(about = "Evaluate a reviewer configuration against a hypothetical pull request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the reviewers that would be requested, before team resolution
    Plan(PlanArgs),
    /// Show which `files` patterns match which changed files
    Match(MatchArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Path to the reviewer configuration
    #[arg(long, default_value = ".github/auto_request_review.yml")]
    config: PathBuf,

    /// Login of the pull request author
    #[arg(long)]
    author: String,

    /// Pull request title
    #[arg(long, default_value = "")]
    title: String,

    /// Treat the pull request as a draft
    #[arg(long)]
    draft: bool,

    /// Changed file paths
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Skip eligibility checks and sampling, printing every candidate
    #[arg(long)]
    all: bool,
}

#[derive(Parser, Debug)]
struct MatchArgs {
    /// Path to the reviewer configuration
    #[arg(long, default_value = ".github/auto_request_review.yml")]
    config: PathBuf,

    /// Changed file paths
    #[arg(num_args = 1..)]
    files: Vec<String>,
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
    Config::from_yaml_str(&text)
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let pull_request = PullRequest {
        author: args.author,
        title: args.title,
        is_draft: args.draft,
        changed_files: args.files,
    };

    let output = if args.all {
        json!({ "reviewers": to_strings(&collect_candidates(&config, &pull_request)) })
    } else {
        match plan(&config, &pull_request) {
            Plan::Skip(reason) => json!({ "skipped": reason.to_string() }),
            Plan::Request(reviewers) => json!({ "reviewers": to_strings(&reviewers) }),
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let rules = config.files.unwrap_or_default();

    let matches: Vec<_> = args
        .files
        .iter()
        .map(|file| {
            let patterns: Vec<&str> = rules
                .iter()
                .filter(|rule| rule.pattern.matches(file))
                .map(|rule| rule.pattern.as_str())
                .collect();
            json!({ "file": file, "patterns": patterns })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => run_plan(args),
        Commands::Match(args) => run_match(args),
    }
}
