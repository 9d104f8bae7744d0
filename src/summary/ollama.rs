//! Ollama `/api/generate` summarizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{Summarizer, default_timeout, error_body, http_client};
use crate::config::LlmSettings;
use crate::github::error::IntakeError;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";

/// Configuration for [`OllamaSummarizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Server base URL.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: default_timeout(),
        }
    }
}

impl OllamaConfig {
    /// Applies the configured overrides on top of the defaults.
    #[must_use]
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let defaults = Self::default();
        Self {
            base_url: settings.base_url.clone().unwrap_or(defaults.base_url),
            model: settings.model.clone().unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }
}

/// Summarizer backed by a local Ollama server.
#[derive(Debug, Clone, Default)]
pub struct OllamaSummarizer {
    config: OllamaConfig,
}

impl OllamaSummarizer {
    /// Creates a summarizer from explicit configuration.
    #[must_use]
    pub const fn new(config: OllamaConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn summarise(&self, prompt: &str) -> Result<String, IntakeError> {
        let endpoint = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        let payload = GenerateRequest {
            model: self.config.model.as_str(),
            prompt,
            stream: false,
        };

        let response = http_client(self.config.timeout, "Ollama")?
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|error| IntakeError::Network {
                message: format!("Ollama request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = error_body(response).await;
            return Err(IntakeError::Api {
                message: format!("Ollama request failed with status {}: {body}", status.as_u16()),
            });
        }

        let decoded: GenerateResponse = response.json().await.map_err(|error| IntakeError::Api {
            message: format!("Ollama response JSON decoding failed: {error}"),
        })?;
        Ok(decoded.response)
    }
}
