use std::sync::Arc;

use crate::error::{Error, Result};
use crate::github::ProfileFetcher;
use crate::llm::LLMProvider;
use crate::models::{DevProfile, ProfileAnalysis};

/// Single-profile career analysis. Unlike a battle there is no numeric result to
/// fall back on, so an LLM failure fails the whole analysis.
pub struct ProfileAnalyzer {
    fetcher: Arc<dyn ProfileFetcher>,
    llm: Arc<dyn LLMProvider>,
}

#[derive(Debug, Clone)]
pub struct AnalyzedProfile {
    pub profile: DevProfile,
    pub analysis: ProfileAnalysis,
}

impl ProfileAnalyzer {
    pub fn new(fetcher: impl ProfileFetcher + 'static, llm: impl LLMProvider + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            llm: Arc::new(llm),
        }
    }

    pub async fn analyze_user(&self, username: &str) -> Result<AnalyzedProfile> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("A GitHub username is required".to_string()));
        }

        let profile = self
            .fetcher
            .fetch_profile(username)
            .await
            .map_err(|e| Error::fetch_failed(username, e))?;

        tracing::info!("Requesting {} career analysis for {}", self.llm.name(), username);
        let analysis = self.llm.analyze_profile(&profile).await.map_err(|e| {
            tracing::error!("Profile analysis failed for {}: {}", username, e);
            e
        })?;

        Ok(AnalyzedProfile { profile, analysis })
    }
}
