use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashMap;

use crate::config::{FetcherConfig, LANGUAGE_REPO_BOUNDS, TOP_LANGUAGE_BOUNDS};
use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::models::{DevProfile, Repository};

/// Source of normalized developer profiles.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<DevProfile>;
}

pub struct GitHubProfileFetcher {
    github: GitHubClient,
    config: FetcherConfig,
}

impl GitHubProfileFetcher {
    /// Out-of-range knobs are clamped so a profile never lists more than five languages.
    pub fn new(github: GitHubClient, config: FetcherConfig) -> Self {
        let config = FetcherConfig {
            language_repo_limit: config
                .language_repo_limit
                .clamp(*LANGUAGE_REPO_BOUNDS.start(), *LANGUAGE_REPO_BOUNDS.end()),
            top_language_count: config
                .top_language_count
                .clamp(*TOP_LANGUAGE_BOUNDS.start(), *TOP_LANGUAGE_BOUNDS.end()),
        };
        Self { github, config }
    }

    /// Byte counts across the most recently updated repositories, looked up concurrently.
    async fn language_bytes(&self, repos: &[Repository]) -> Result<HashMap<String, u64>> {
        let lookups = repos
            .iter()
            .take(self.config.language_repo_limit)
            .map(|repo| self.github.get_repo_languages(&repo.owner.login, &repo.name));

        let per_repo = try_join_all(lookups).await?;
        Ok(merge_language_bytes(per_repo))
    }
}

#[async_trait]
impl ProfileFetcher for GitHubProfileFetcher {
    async fn fetch_profile(&self, username: &str) -> Result<DevProfile> {
        tracing::info!("Fetching GitHub profile for: {}", username);

        let (user, repos, events, orgs) = tokio::try_join!(
            self.github.get_user(username),
            self.github.get_user_repos(username),
            self.github.get_public_events(username),
            self.github.get_user_orgs(username),
        )?;

        let bytes = self.language_bytes(&repos).await?;
        let languages = top_languages(&bytes, self.config.top_language_count);
        tracing::debug!(
            "{}: {} repos, {} languages seen, top {:?}",
            username,
            repos.len(),
            bytes.len(),
            languages
        );

        Ok(DevProfile::from_github(user, &repos, &events, orgs, languages))
    }
}

/// Sums byte counts per language. Order of the inputs does not matter.
pub fn merge_language_bytes<I>(per_repo: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = HashMap<String, u64>>,
{
    per_repo
        .into_iter()
        .fold(HashMap::new(), |mut totals, languages| {
            for (language, bytes) in languages {
                *totals.entry(language).or_insert(0) += bytes;
            }
            totals
        })
}

/// Languages by byte volume, largest first; equal volumes sort by name.
pub fn top_languages(bytes: &HashMap<String, u64>, count: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, &u64)> = bytes.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(count)
        .map(|(language, _)| language.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn langs(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(l, b)| (l.to_string(), *b)).collect()
    }

    #[test]
    fn test_merge_sums_per_language() {
        let merged = merge_language_bytes(vec![
            langs(&[("Rust", 100), ("Shell", 5)]),
            langs(&[("Rust", 50), ("Python", 70)]),
            HashMap::new(),
        ]);
        assert_eq!(merged, langs(&[("Rust", 150), ("Shell", 5), ("Python", 70)]));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = langs(&[("Go", 10), ("C", 3)]);
        let b = langs(&[("Go", 1), ("Zig", 8)]);
        let c = langs(&[("C", 4)]);

        let forward = merge_language_bytes(vec![a.clone(), b.clone(), c.clone()]);
        let backward = merge_language_bytes(vec![c, b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_top_languages_ranks_by_bytes() {
        let bytes = langs(&[
            ("TypeScript", 900),
            ("CSS", 20),
            ("Rust", 1200),
            ("HTML", 40),
            ("Shell", 5),
            ("Dockerfile", 1),
        ]);
        assert_eq!(
            top_languages(&bytes, 5),
            vec!["Rust", "TypeScript", "HTML", "CSS", "Shell"]
        );
    }

    #[test]
    fn test_top_languages_breaks_ties_by_name() {
        let bytes = langs(&[("Zig", 10), ("Ada", 10), ("Nim", 10)]);
        assert_eq!(top_languages(&bytes, 2), vec!["Ada", "Nim"]);
    }

    #[test]
    fn test_top_languages_empty() {
        assert!(top_languages(&HashMap::new(), 5).is_empty());
    }

    async fn mock_account(server: &MockServer, repo_count: usize) {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/octo");
                then.status(200).json_body(json!({
                    "login": "octo",
                    "id": 1,
                    "name": "Octo Cat",
                    "avatar_url": "https://avatars.example.com/octo",
                    "bio": "Tentacles",
                    "company": "",
                    "location": null,
                    "blog": "https://octo.dev",
                    "twitter_username": null,
                    "public_repos": 57,
                    "followers": 250,
                    "following": 3,
                    "created_at": "2015-03-01T00:00:00Z"
                }));
            })
            .await;

        let repos: Vec<_> = (0..repo_count)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("r{}", i),
                    "full_name": format!("octo/r{}", i),
                    "fork": false,
                    "updated_at": "2024-05-01T00:00:00Z",
                    "owner": { "login": "octo" }
                })
            })
            .collect();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/octo/repos");
                then.status(200).json_body(json!(repos));
            })
            .await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/octo/events/public");
                then.status(200).json_body(json!([
                    { "id": "99", "type": "PushEvent", "created_at": "2024-05-30T08:00:00Z" }
                ]));
            })
            .await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/octo/orgs");
                then.status(200)
                    .json_body(json!([{ "login": "rust-lang" }, { "login": "tokio-rs" }]));
            })
            .await;
    }

    fn fetcher_for(server: &MockServer) -> GitHubProfileFetcher {
        let github = GitHubClient::new(None)
            .unwrap()
            .with_base_url(server.base_url());
        GitHubProfileFetcher::new(github, FetcherConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_profile_aggregates_languages_across_repos() {
        let server = MockServer::start_async().await;
        mock_account(&server, 3).await;
        for (repo, body) in [
            ("r0", json!({ "Rust": 5000, "Shell": 100 })),
            ("r1", json!({ "TypeScript": 3000, "Rust": 1000 })),
            ("r2", json!({})),
        ] {
            server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/repos/octo/{}/languages", repo));
                    then.status(200).json_body(body);
                })
                .await;
        }

        let profile = fetcher_for(&server).fetch_profile("octo").await.unwrap();

        assert_eq!(profile.username, "octo");
        assert_eq!(profile.repositories, 3);
        assert_eq!(profile.public_repos, 57);
        assert_eq!(profile.followers, 250);
        assert_eq!(profile.top_languages, vec!["Rust", "TypeScript", "Shell"]);
        assert_eq!(profile.organizations, vec!["rust-lang", "tokio-rs"]);
        assert_eq!(profile.company, None);
        assert_eq!(profile.blog.as_deref(), Some("https://octo.dev"));
        assert!(profile.last_commit_date.is_some());
    }

    #[tokio::test]
    async fn test_fetch_profile_looks_up_at_most_ten_repos() {
        let server = MockServer::start_async().await;
        mock_account(&server, 12).await;

        let mut looked_up = Vec::new();
        for i in 0..10 {
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/repos/octo/r{}/languages", i));
                    then.status(200).json_body(json!({ "Go": 10 }));
                })
                .await;
            looked_up.push(mock);
        }
        let mut skipped = Vec::new();
        for i in 10..12 {
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/repos/octo/r{}/languages", i));
                    then.status(200).json_body(json!({ "COBOL": 1_000_000 }));
                })
                .await;
            skipped.push(mock);
        }

        let profile = fetcher_for(&server).fetch_profile("octo").await.unwrap();

        assert_eq!(profile.repositories, 12);
        assert_eq!(profile.top_languages, vec!["Go"]);
        for mock in &looked_up {
            mock.assert_hits_async(1).await;
        }
        for mock in &skipped {
            mock.assert_hits_async(0).await;
        }
    }

    #[tokio::test]
    async fn test_rate_limited_language_lookup_fails_the_fetch() {
        let server = MockServer::start_async().await;
        mock_account(&server, 2).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/r0/languages");
                then.status(200).json_body(json!({ "Rust": 10 }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/r1/languages");
                then.status(403)
                    .header("x-ratelimit-remaining", "0")
                    .header("x-ratelimit-reset", "1");
            })
            .await;

        let err = fetcher_for(&server).fetch_profile("octo").await.unwrap_err();
        assert!(matches!(err, Error::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_missing_user_fails_the_fetch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/users/ghost");
                then.status(404);
            })
            .await;

        let err = fetcher_for(&server).fetch_profile("ghost").await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[test]
    fn test_out_of_range_knobs_are_clamped() {
        let github = GitHubClient::new(None).unwrap();
        let fetcher = GitHubProfileFetcher::new(
            github,
            FetcherConfig {
                language_repo_limit: 50,
                top_language_count: 0,
            },
        );
        assert_eq!(fetcher.config.language_repo_limit, 10);
        assert_eq!(fetcher.config.top_language_count, 1);
    }
}
