use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::github::{GitHubUser, Organization, PublicEvent, Repository};

/// Normalized snapshot of a developer's public GitHub presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevProfile {
    pub username: String,
    /// Repositories returned by the owner listing (one page, sorted by last update).
    pub repositories: u32,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    /// Most-used first, by byte volume.
    pub top_languages: Vec<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_commit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub organizations: Vec<String>,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProfileStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    pub message: Option<String>,
    pub emoji: Option<String>,
}

impl DevProfile {
    pub fn from_github(
        user: GitHubUser,
        repos: &[Repository],
        events: &[PublicEvent],
        orgs: Vec<Organization>,
        top_languages: Vec<String>,
    ) -> Self {
        // Events come back newest first.
        let last_commit_date = events.first().and_then(|e| e.created_at);

        Self {
            username: user.login,
            repositories: repos.len() as u32,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            top_languages,
            bio: present(user.bio),
            location: present(user.location),
            company: present(user.company),
            blog: present(user.blog),
            twitter: present(user.twitter_username),
            created_at: user.created_at,
            last_commit_date,
            organizations: orgs.into_iter().map(|o| o.login).collect(),
            avatar_url: user.avatar_url,
            status: None,
        }
    }

    pub fn has_company(&self) -> bool {
        is_set(&self.company)
    }

    pub fn has_blog(&self) -> bool {
        is_set(&self.blog)
    }

    pub fn has_twitter(&self) -> bool {
        is_set(&self.twitter)
    }

    pub fn has_location(&self) -> bool {
        is_set(&self.location)
    }

    pub fn has_bio(&self) -> bool {
        is_set(&self.bio)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
}
