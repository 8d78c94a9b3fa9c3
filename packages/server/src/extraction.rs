use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::{ExtractorConfig, ExtractorProvider};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response contained no choices")]
    Empty,

    #[error("extractor is not configured: {0}")]
    Config(String),
}

/// Pulls a class schedule out of recognized text.
#[async_trait]
pub trait ScheduleExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<String, ExtractionError>;
}

pub fn build_prompt(text: &str) -> String {
    format!("Extract the class schedule from the following text:\n\n{text}")
}

/// Uses the recognized text as the schedule.
pub struct PassthroughExtractor;

#[async_trait]
impl ScheduleExtractor for PassthroughExtractor {
    async fn extract(&self, text: &str) -> Result<String, ExtractionError> {
        Ok(text.trim().to_string())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Client for an OpenAI-style `/completions` endpoint.
pub struct CompletionExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl CompletionExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractionError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExtractionError::Config("extractor.api_key is required".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ScheduleExtractor for CompletionExtractor {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn extract(&self, text: &str) -> Result<String, ExtractionError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt: build_prompt(text),
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionResponse = response.json().await?;
        let choice = body.choices.into_iter().next().ok_or(ExtractionError::Empty)?;

        Ok(choice.text.trim().to_string())
    }
}

/// Picks the extractor named by the configuration.
pub fn build_extractor(
    config: &ExtractorConfig,
) -> Result<Arc<dyn ScheduleExtractor>, ExtractionError> {
    match config.provider {
        ExtractorProvider::Completion => Ok(Arc::new(CompletionExtractor::new(config)?)),
        ExtractorProvider::Passthrough => Ok(Arc::new(PassthroughExtractor)),
    }
}
