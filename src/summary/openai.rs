//! OpenAI-compatible chat-completions summarizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{Summarizer, default_timeout, error_body, http_client};
use crate::config::LlmSettings;
use crate::github::error::IntakeError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for [`OpenAiSummarizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base API URL (e.g., `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model identifier sent in chat-completions requests.
    pub model: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

impl OpenAiConfig {
    /// Applies the configured overrides on top of the defaults.
    #[must_use]
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let defaults = Self::default();
        Self {
            base_url: settings.base_url.clone().unwrap_or(defaults.base_url),
            model: settings.model.clone().unwrap_or(defaults.model),
            api_key: settings.api_key.clone(),
            timeout: defaults.timeout,
        }
    }
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone, Default)]
pub struct OpenAiSummarizer {
    config: OpenAiConfig,
}

impl OpenAiSummarizer {
    /// Creates a summarizer from explicit configuration.
    #[must_use]
    pub const fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    fn api_key(&self) -> Result<&str, IntakeError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| IntakeError::Configuration {
                message: "LLM API key is required for openai (use --llm-api-key or PRTOOL_LLM_API_KEY)"
                    .to_owned(),
            })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarise(&self, prompt: &str) -> Result<String, IntakeError> {
        let api_key = self.api_key()?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages: vec![ChatCompletionsMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = http_client(self.config.timeout, "OpenAI")?
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| IntakeError::Network {
                message: format!("OpenAI request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = error_body(response).await;
            return Err(IntakeError::Api {
                message: format!("OpenAI request failed with status {}: {body}", status.as_u16()),
            });
        }

        let decoded: ChatCompletionsResponse =
            response.json().await.map_err(|error| IntakeError::Api {
                message: format!("OpenAI response JSON decoding failed: {error}"),
            })?;

        decoded
            .choices
            .first()
            .and_then(|choice| parse_content_value(&choice.message.content))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| IntakeError::Api {
                message: "OpenAI response did not contain assistant text".to_owned(),
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}
