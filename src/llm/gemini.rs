use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_GEMINI_MODEL;
use crate::error::{Error, Result};
use crate::llm::parser::{parse_battle_insights, parse_profile_analysis};
use crate::llm::prompts::{profile_analysis_prompt, BattleNarrativeRequest};
use crate::llm::provider::LLMProvider;
use crate::models::{BattleInsights, DevProfile, ProfileAnalysis};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiProvider {
    /// A provider without a key is still constructed; every call then fails,
    /// which battles treat like any other narrative failure.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn generate_text(&self, prompt: String) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::LLMApi("GEMINI_API_KEY not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        tracing::debug!("Sending {} prompt chars to Gemini ({})", prompt.len(), self.model);

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LLMApi(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(error) = result.error {
            return Err(Error::LLMApi(error.message));
        }

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::LLMApi("Empty response from Gemini".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate_battle_insights(
        &self,
        request: &BattleNarrativeRequest,
    ) -> Result<BattleInsights> {
        let text = self.generate_text(request.to_prompt()).await?;
        parse_battle_insights(&text).map_err(|e| {
            tracing::debug!("Raw Gemini battle response: {}", text);
            e
        })
    }

    async fn analyze_profile(&self, profile: &DevProfile) -> Result<ProfileAnalysis> {
        let text = self.generate_text(profile_analysis_prompt(profile)).await?;
        parse_profile_analysis(&text).map_err(|e| {
            tracing::debug!("Raw Gemini analysis response: {}", text);
            e
        })
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
