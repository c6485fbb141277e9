pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod llm;
pub mod scoring;
pub mod battle;
pub mod analysis;
pub mod storage;

pub use config::{Config, FetcherConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, GitHubProfileFetcher, ProfileFetcher};
pub use llm::{GeminiProvider, LLMProvider};
pub use scoring::{calculate_battle_stats, ScoringEngine};
pub use battle::BattleArena;
pub use analysis::ProfileAnalyzer;
pub use storage::Storage;
