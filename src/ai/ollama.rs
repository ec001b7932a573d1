//! Ollama client

use super::{AiAssistant, comment_prompt, conflict_prompt, extract_resolved_block};
use crate::config::AiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a local or remote Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Ai(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model_name().to_string(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, "calling Ollama");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await
            .map_err(|e| Error::Ai(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("Ollama error {status}: {body}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Ai(format!("failed to parse Ollama response: {e}")))?;

        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            return Err(Error::Ai("Ollama returned an empty response".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl AiAssistant for OllamaClient {
    async fn resolve_conflict(&self, file_content: &str, conflict_block: &str) -> Result<String> {
        let reply = self
            .generate(&conflict_prompt(file_content, conflict_block))
            .await?;
        Ok(extract_resolved_block(&reply))
    }

    async fn generate_comment(&self, issue_description: &str) -> Result<String> {
        self.generate(&comment_prompt(issue_description)).await
    }
}
