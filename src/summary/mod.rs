//! Pull request summaries from a language model provider.
//!
//! [`build_context`] flattens the collected pull requests into plain text,
//! [`select`] picks a [`Summarizer`] from the configured provider, and
//! [`summarise_with_fallback`] runs it without ever failing the report.

mod ollama;
mod openai;

pub use ollama::{OllamaConfig, OllamaSummarizer};
pub use openai::{OpenAiConfig, OpenAiSummarizer};

use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::LlmSettings;
use crate::files;
use crate::github::error::IntakeError;
use crate::github::models::PullRequest;

/// Separator written after each pull request in the context.
pub const CONTEXT_DELIMITER: &str = "---";

/// Instructions sent ahead of the context when no prompt file is given.
pub const DEFAULT_PROMPT: &str = concat!(
    "Summarise the following merged pull requests for a weekly engineering update. ",
    "Group related changes, call out notable features and fixes, and keep it concise.",
);

/// Text returned by the stub provider.
pub const STUB_SUMMARY: &str = "This is a stub summary. Configure an LLM provider to generate a real summary.";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider contract: turn a prompt into summary text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Summarise `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] when the provider call fails.
    async fn summarise(&self, prompt: &str) -> Result<String, IntakeError>;
}

/// Provider returning fixed text; the default when nothing is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubSummarizer {
    summary: String,
}

impl StubSummarizer {
    /// Stub answering with `summary`.
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

impl Default for StubSummarizer {
    fn default() -> Self {
        Self::new(STUB_SUMMARY)
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn summarise(&self, _prompt: &str) -> Result<String, IntakeError> {
        Ok(self.summary.clone())
    }
}

/// Renders pull requests as plain text, one block per pull request.
///
/// # Example
///
/// ```
/// use prtool::github::models::test_support::merged_pull_request;
/// use prtool::summary::build_context;
///
/// let pr = merged_pull_request("acme/api", 7, "2024-07-05T10:00:00Z");
/// let context = build_context(&[pr]);
/// assert!(context.starts_with("Title: Change 7\n"));
/// assert!(context.contains("Merged At: 2024-07-05\n"));
/// assert!(context.ends_with("---\n"));
/// ```
#[must_use]
pub fn build_context(pull_requests: &[PullRequest]) -> String {
    pull_requests
        .iter()
        .map(|pull_request| {
            let merged = pull_request
                .merged_at
                .map(|merged_at| merged_at.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            format!(
                "Title: {}\nBody: {}\nURL: {}\nAuthor: {}\nMerged At: {merged}\nLabels: {}\n{CONTEXT_DELIMITER}\n",
                pull_request.title,
                pull_request.body,
                pull_request.url,
                pull_request.author.as_deref().unwrap_or_default(),
                pull_request.labels.join(", "),
            )
        })
        .collect()
}

/// Prepends `instructions` to `context`.
#[must_use]
pub fn build_prompt(instructions: &str, context: &str) -> String {
    format!("{}\n\n{context}", instructions.trim_end())
}

/// Returns the prompt file contents, or [`DEFAULT_PROMPT`] without a file.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the prompt file cannot be read.
pub fn load_instructions(path: Option<&Utf8Path>) -> Result<String, IntakeError> {
    path.map_or_else(
        || Ok(DEFAULT_PROMPT.to_owned()),
        |prompt_path| files::read_required(prompt_path, "prompt file"),
    )
}

/// Builds the provider named in `settings`.
///
/// Unknown providers and `openai` without an API key fall back to the stub
/// with a warning.
#[must_use]
pub fn select(settings: &LlmSettings) -> Box<dyn Summarizer> {
    match settings.provider.as_str() {
        "" | "stub" => Box::new(StubSummarizer::default()),
        "openai" => {
            if settings.api_key.is_none() {
                warn!("OpenAI API key not provided, falling back to stub");
                return Box::new(StubSummarizer::default());
            }
            Box::new(OpenAiSummarizer::new(OpenAiConfig::from_settings(settings)))
        }
        "ollama" => Box::new(OllamaSummarizer::new(OllamaConfig::from_settings(settings))),
        other => {
            warn!(provider = other, "unknown LLM provider, falling back to stub");
            Box::new(StubSummarizer::default())
        }
    }
}

/// Runs `summarizer`, logging and discarding failures and empty answers.
pub async fn summarise_with_fallback(summarizer: &dyn Summarizer, prompt: &str) -> Option<String> {
    match summarizer.summarise(prompt).await {
        Ok(summary) => {
            let trimmed = summary.trim();
            if trimmed.is_empty() {
                warn!(provider = summarizer.name(), "summary was empty; rendering without it");
                return None;
            }
            info!(provider = summarizer.name(), "summary generated");
            Some(trimmed.to_owned())
        }
        Err(error) => {
            warn!(provider = summarizer.name(), error = %error, "failed to generate summary");
            None
        }
    }
}

pub(crate) fn http_client(timeout: Duration, provider: &str) -> Result<Client, IntakeError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| IntakeError::Configuration {
            message: format!("failed to configure {provider} HTTP client: {error}"),
        })
}

pub(crate) const fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

pub(crate) fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output: String = message.chars().take(max_chars).collect();
    if message.chars().nth(max_chars).is_some() {
        output.push_str("...");
    }
    output
}

pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.map_or_else(
        |_| "(failed to read error response body)".to_owned(),
        |content| truncate_for_message(content.as_str(), 160),
    )
}

#[cfg(test)]
mod tests;
