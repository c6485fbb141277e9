use async_trait::async_trait;

use crate::error::Result;
use crate::llm::prompts::BattleNarrativeRequest;
use crate::models::{BattleInsights, DevProfile, ProfileAnalysis};

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate_battle_insights(
        &self,
        request: &BattleNarrativeRequest,
    ) -> Result<BattleInsights>;
    async fn analyze_profile(&self, profile: &DevProfile) -> Result<ProfileAnalysis>;
    fn name(&self) -> &str;
}
