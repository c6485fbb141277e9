pub mod client;
pub mod fetcher;

pub use client::GitHubClient;
pub use fetcher::{merge_language_bytes, top_languages, GitHubProfileFetcher, ProfileFetcher};
