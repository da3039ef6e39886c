//! Live reconciliation against GitHub: team rosters and reviewers that were
//! already requested. Both stages are no-ops unless `load_github_members` is
//! present in the configuration.

use anyhow::Result;
use futures_util::future::try_join_all;
use reviewer_core::{dedup, exclude, Options, ReviewerId};
use tracing::{debug, info, warn};

use crate::api::PullRequestApi;

/// Replace `team:` references with the members of each team.
///
/// Rosters are fetched concurrently. A team that does not exist contributes
/// nobody. Without `force_pick`, a team is only surfaced when the author is
/// one of its members. The author is removed from every roster; plain
/// individuals pass through unchanged.
pub async fn resolve_teams_and_filter<A: PullRequestApi + ?Sized>(
    api: &A,
    reviewers: Vec<ReviewerId>,
    author: &str,
    options: &Options,
) -> Result<Vec<ReviewerId>> {
    if !options.loads_github_members() {
        return Ok(reviewers);
    }

    let (teams, individuals): (Vec<ReviewerId>, Vec<ReviewerId>) = reviewers
        .into_iter()
        .partition(|reviewer| reviewer.as_team().is_some());

    let lookups = teams.iter().filter_map(ReviewerId::as_team).map(|slug| async move {
        let roster = match api.list_team_members(slug).await? {
            Some(members) => members,
            None => {
                warn!("Team '{}' was not found, treating it as empty", slug);
                Vec::new()
            }
        };
        Ok::<_, anyhow::Error>((slug, roster))
    });
    let rosters = try_join_all(lookups).await?;

    let members = rosters
        .into_iter()
        .flat_map(|(slug, roster)| {
            if options.force_pick || roster.iter().any(|member| member == author) {
                debug!("Surfacing {} members of team '{}'", roster.len(), slug);
                roster
            } else {
                debug!("Author {} is not in team '{}', skipping it", author, slug);
                Vec::new()
            }
        })
        .filter(|member| member != author)
        .map(ReviewerId::Individual);

    let resolved = dedup(individuals.into_iter().chain(members));
    info!("{} reviewers after resolving teams", resolved.len());
    Ok(resolved)
}

/// Drop reviewers who are already requested on the pull request.
pub async fn remove_already_requested<A: PullRequestApi + ?Sized>(
    api: &A,
    reviewers: Vec<ReviewerId>,
    options: &Options,
) -> Result<Vec<ReviewerId>> {
    if !options.loads_github_members() {
        return Ok(reviewers);
    }

    let requested: Vec<ReviewerId> = api
        .list_requested_reviewers()
        .await?
        .iter()
        .map(|r| ReviewerId::member(r))
        .collect();

    if !requested.is_empty() {
        debug!("Already requested: {:?}", requested);
    }

    Ok(exclude(reviewers, &requested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryApi;
    use reviewer_core::to_strings;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;
    use tokio::time::timeout;

    fn ids(names: &[&str]) -> Vec<ReviewerId> {
        names.iter().map(|name| ReviewerId::from(*name)).collect()
    }

    fn live(force_pick: bool) -> Options {
        Options {
            load_github_members: Some(true),
            force_pick,
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_without_load_github_members() {
        let api = InMemoryApi::new().with_team("infra", ["bob"]);
        let input = ids(&["team:infra", "alice"]);

        let resolved = resolve_teams_and_filter(&api, input.clone(), "alice", &Options::default())
            .await
            .unwrap();

        assert_eq!(resolved, input);
        assert!(api.team_lookups().await.is_empty());
    }

    #[tokio::test]
    async fn test_presence_not_truthiness_enables_lookup() {
        let api = InMemoryApi::new().with_team("infra", ["bob"]);
        let options = Options {
            load_github_members: Some(false),
            force_pick: true,
            ..Options::default()
        };

        let resolved = resolve_teams_and_filter(&api, ids(&["team:infra"]), "alice", &options)
            .await
            .unwrap();

        assert_eq!(to_strings(&resolved), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_team_without_author_is_dropped() {
        let api = InMemoryApi::new().with_team("infra", ["bob"]);

        let resolved =
            resolve_teams_and_filter(&api, ids(&["team:infra", "alice"]), "alice", &live(false))
                .await
                .unwrap();

        assert_eq!(to_strings(&resolved), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_team_with_author_surfaces_peers() {
        let api = InMemoryApi::new().with_team("infra", ["bob", "alice", "carol"]);

        let resolved = resolve_teams_and_filter(&api, ids(&["team:infra"]), "alice", &live(false))
            .await
            .unwrap();

        assert_eq!(to_strings(&resolved), vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_force_pick_surfaces_every_team() {
        let api = InMemoryApi::new()
            .with_team("infra", ["bob", "alice"])
            .with_team("web", ["carol", "bob"]);

        let resolved = resolve_teams_and_filter(
            &api,
            ids(&["dan", "team:infra", "team:web"]),
            "alice",
            &live(true),
        )
        .await
        .unwrap();

        assert_eq!(to_strings(&resolved), vec!["dan", "bob", "carol"]);
        let mut lookups = api.team_lookups().await;
        lookups.sort();
        assert_eq!(lookups, vec!["infra", "web"]);
    }

    #[tokio::test]
    async fn test_team_lookups_are_in_flight_together() {
        let api = InMemoryApi::new()
            .with_team("infra", ["bob"])
            .with_team("web", ["carol"])
            .with_team("docs", ["dan"])
            .with_lookup_barrier(Arc::new(Barrier::new(3)));

        let resolved = timeout(
            Duration::from_secs(5),
            resolve_teams_and_filter(
                &api,
                ids(&["team:infra", "team:web", "team:docs"]),
                "alice",
                &live(true),
            ),
        )
        .await
        .expect("lookups ran one at a time")
        .unwrap();

        assert_eq!(to_strings(&resolved), vec!["bob", "carol", "dan"]);
    }

    #[tokio::test]
    async fn test_missing_team_degrades_to_empty() {
        let api = InMemoryApi::new().with_team("web", ["carol"]);

        let resolved = resolve_teams_and_filter(
            &api,
            ids(&["team:ghost", "team:web", "dan"]),
            "alice",
            &live(true),
        )
        .await
        .unwrap();

        assert_eq!(to_strings(&resolved), vec!["dan", "carol"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_fatal() {
        let api = InMemoryApi::new().with_failing_team("infra");

        let result =
            resolve_teams_and_filter(&api, ids(&["team:infra"]), "alice", &live(true)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_already_requested_are_removed() {
        let api = InMemoryApi::new().with_requested(["alice", "team:web"]);

        let remaining =
            remove_already_requested(&api, ids(&["alice", "bob", "team:web"]), &live(false))
                .await
                .unwrap();

        assert_eq!(to_strings(&remaining), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_already_requested_ignored_when_disabled() {
        let api = InMemoryApi::new().with_requested(["alice"]);

        let remaining = remove_already_requested(&api, ids(&["alice"]), &Options::default())
            .await
            .unwrap();

        assert_eq!(to_strings(&remaining), vec!["alice"]);
    }
}
