use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::{GitHubUser, Organization, PublicEvent, Repository};

pub const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Without a token the API still answers, with the anonymous rate limit.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("devbattle/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);
        self.get_json(&url, username).await
    }

    /// First page only, most recently updated first.
    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=updated",
            self.base_url, username
        );
        tracing::debug!("Fetching repositories for: {}", username);
        self.get_json(&url, username).await
    }

    pub async fn get_public_events(&self, username: &str) -> Result<Vec<PublicEvent>> {
        let url = format!("{}/users/{}/events/public?per_page=1", self.base_url, username);
        tracing::debug!("Fetching latest public event for: {}", username);
        self.get_json(&url, username).await
    }

    pub async fn get_user_orgs(&self, username: &str) -> Result<Vec<Organization>> {
        let url = format!("{}/users/{}/orgs", self.base_url, username);
        tracing::debug!("Fetching organizations for: {}", username);
        self.get_json(&url, username).await
    }

    /// Bytes per language. A repository that is gone or still empty counts as empty;
    /// an exhausted quota or any other failure fails the lookup.
    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::CONFLICT {
            tracing::debug!("Skipping languages for {}/{}: {}", owner, repo, status);
            return Ok(HashMap::new());
        }

        let response = check_status(response, &format!("{}/{}", owner, repo)).await?;
        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, username: &str) -> Result<T> {
        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        let response = check_status(response, username).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response, subject: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(Error::UserNotFound(subject.to_string()));
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if let Some(wait_secs) = rate_limit_wait(response.headers()) {
            return Err(Error::RateLimited(wait_secs));
        }
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!(
        "Request for {} failed: {} - {}",
        subject, status, body
    )))
}

/// Seconds until the quota resets, if the response says the quota is spent.
fn rate_limit_wait(headers: &header::HeaderMap) -> Option<u64> {
    let remaining: u64 = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())?;

    if remaining > 0 {
        return None;
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let now = chrono::Utc::now().timestamp();

    Some((reset - now).max(0) as u64)
}
