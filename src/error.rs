use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch GitHub profile for {username}: {source}")]
    FetchFailed {
        username: String,
        #[source]
        source: Box<Error>,
    },

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Rate limit exceeded, resets in {0} seconds")]
    RateLimited(u64),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn fetch_failed(username: &str, source: Error) -> Self {
        Error::FetchFailed {
            username: username.to_string(),
            source: Box::new(source),
        }
    }

    /// Narrative failures are contained by the battle arena instead of aborting the battle.
    pub fn is_narrative(&self) -> bool {
        matches!(self, Error::LLMApi(_) | Error::ParseError(_))
    }
}
