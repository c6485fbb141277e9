use crate::error::{Error, Result};
use std::env;
use std::ops::RangeInclusive;

pub const DEFAULT_SESSION_DB: &str = "devbattle-session.db";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// A profile lists at most five languages and looks at most ten repositories.
pub const TOP_LANGUAGE_BOUNDS: RangeInclusive<usize> = 1..=5;
pub const LANGUAGE_REPO_BOUNDS: RangeInclusive<usize> = 1..=10;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub session_db_path: String,
    pub language_repo_limit: usize,
    pub top_language_count: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = non_empty_var("GITHUB_TOKEN");
        if github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set, using unauthenticated GitHub API limits");
        }

        let gemini_api_key = non_empty_var("GEMINI_API_KEY");

        let gemini_model =
            non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let session_db_path =
            non_empty_var("SESSION_DB_PATH").unwrap_or_else(|| DEFAULT_SESSION_DB.to_string());

        let language_repo_limit = parse_bounded(
            "LANGUAGE_REPO_LIMIT",
            non_empty_var("LANGUAGE_REPO_LIMIT"),
            LANGUAGE_REPO_BOUNDS,
        )?
        .unwrap_or(10);
        let top_language_count = parse_bounded(
            "TOP_LANGUAGE_COUNT",
            non_empty_var("TOP_LANGUAGE_COUNT"),
            TOP_LANGUAGE_BOUNDS,
        )?
        .unwrap_or(5);

        Ok(Self {
            github_token,
            gemini_api_key,
            gemini_model,
            session_db_path,
            language_repo_limit,
            top_language_count,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bounded(
    key: &str,
    value: Option<String>,
    bounds: RangeInclusive<usize>,
) -> Result<Option<usize>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().parse::<usize>() {
        Ok(n) if bounds.contains(&n) => Ok(Some(n)),
        _ => Err(Error::Config(format!(
            "{} must be an integer between {} and {}, got {:?}",
            key,
            bounds.start(),
            bounds.end(),
            value
        ))),
    }
}

/// Knobs for the per-profile fetch.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// How many of the most recently updated repositories get a language lookup.
    pub language_repo_limit: usize,
    pub top_language_count: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            language_repo_limit: 10,
            top_language_count: 5,
        }
    }
}

impl From<&Config> for FetcherConfig {
    fn from(config: &Config) -> Self {
        Self {
            language_repo_limit: config.language_repo_limit,
            top_language_count: config.top_language_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str, bounds: RangeInclusive<usize>) -> Result<Option<usize>> {
        parse_bounded("TOP_LANGUAGE_COUNT", Some(value.to_string()), bounds)
    }

    #[test]
    fn test_unset_value_falls_back_to_default() {
        let parsed = parse_bounded("LANGUAGE_REPO_LIMIT", None, LANGUAGE_REPO_BOUNDS);
        assert_eq!(parsed.unwrap(), None);
    }

    #[test]
    fn test_values_inside_bounds_are_accepted() {
        assert_eq!(parse(" 3 ", TOP_LANGUAGE_BOUNDS).unwrap(), Some(3));
        assert_eq!(parse("1", LANGUAGE_REPO_BOUNDS).unwrap(), Some(1));
        assert_eq!(parse("10", LANGUAGE_REPO_BOUNDS).unwrap(), Some(10));
    }

    #[test]
    fn test_values_outside_bounds_are_rejected() {
        for value in ["0", "6", "-1", "five"] {
            let err = parse(value, TOP_LANGUAGE_BOUNDS).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} should be rejected", value);
        }
        assert!(parse("11", LANGUAGE_REPO_BOUNDS).is_err());
    }

    #[test]
    fn test_fetcher_defaults_sit_inside_bounds() {
        let defaults = FetcherConfig::default();
        assert!(LANGUAGE_REPO_BOUNDS.contains(&defaults.language_repo_limit));
        assert!(TOP_LANGUAGE_BOUNDS.contains(&defaults.top_language_count));
    }
}
