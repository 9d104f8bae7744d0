//! Tests for context building, provider selection, and fallback.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;
use tempfile::TempDir;

use super::{
    DEFAULT_PROMPT, MockSummarizer, STUB_SUMMARY, StubSummarizer, Summarizer, build_context,
    build_prompt, load_instructions, select, summarise_with_fallback, truncate_for_message,
};
use crate::config::LlmSettings;
use crate::github::error::IntakeError;
use crate::github::models::test_support::{merged_pull_request, with_labels};

fn settings(provider: &str, api_key: Option<&str>) -> LlmSettings {
    LlmSettings {
        provider: provider.to_owned(),
        api_key: api_key.map(ToOwned::to_owned),
        ..LlmSettings::default()
    }
}

#[rstest]
fn context_lists_each_pull_request_in_order() {
    let first = with_labels(
        &merged_pull_request("acme/api", 1, "2025-06-14T09:30:00Z"),
        &["feature", "api"],
    );
    let second = merged_pull_request("acme/web", 2, "2025-06-13T18:00:00Z");

    let context = build_context(&[first, second]);

    let expected = concat!(
        "Title: Change 1\n",
        "Body: Body of change 1\n",
        "URL: https://github.com/acme/api/pull/1\n",
        "Author: octocat\n",
        "Merged At: 2025-06-14\n",
        "Labels: feature, api\n",
        "---\n",
        "Title: Change 2\n",
        "Body: Body of change 2\n",
        "URL: https://github.com/acme/web/pull/2\n",
        "Author: octocat\n",
        "Merged At: 2025-06-13\n",
        "Labels: \n",
        "---\n",
    );
    assert_eq!(context, expected);
}

#[rstest]
fn empty_input_has_empty_context() {
    assert_eq!(build_context(&[]), "");
}

#[rstest]
fn prompt_precedes_context() {
    assert_eq!(
        build_prompt("Summarise.\n", "Title: x\n---\n"),
        "Summarise.\n\nTitle: x\n---\n"
    );
}

#[rstest]
fn instructions_default_without_prompt_file() {
    assert_eq!(load_instructions(None).as_deref(), Ok(DEFAULT_PROMPT));
}

#[rstest]
fn instructions_come_from_prompt_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("prompt.txt"))
        .expect("temp dir should be UTF-8");
    std::fs::write(&path, "Write release notes.").expect("prompt should be written");

    assert_eq!(
        load_instructions(Some(&path)).as_deref(),
        Ok("Write release notes.")
    );
}

#[rstest]
fn missing_prompt_file_is_an_error() {
    let result = load_instructions(Some(Utf8Path::new("/nonexistent/prompt.txt")));
    assert!(matches!(result, Err(IntakeError::Io { .. })), "got {result:?}");
}

#[rstest]
#[case::default_stub("stub", None, "stub")]
#[case::blank_is_stub("", None, "stub")]
#[case::openai_with_key("openai", Some("sk-test"), "openai")]
#[case::openai_without_key_falls_back("openai", None, "stub")]
#[case::ollama("ollama", None, "ollama")]
#[case::unknown_falls_back("bard", Some("key"), "stub")]
fn provider_selection(#[case] provider: &str, #[case] key: Option<&str>, #[case] expected: &str) {
    assert_eq!(select(&settings(provider, key)).name(), expected);
}

#[tokio::test]
async fn stub_returns_fixed_text() {
    let summary = StubSummarizer::default()
        .summarise("anything")
        .await
        .expect("stub never fails");
    assert_eq!(summary, STUB_SUMMARY);
}

#[tokio::test]
async fn failures_are_swallowed() {
    let mut summarizer = MockSummarizer::new();
    summarizer.expect_name().return_const("mock");
    summarizer.expect_summarise().times(1).returning(|_| {
        Err(IntakeError::Network {
            message: "connection refused".to_owned(),
        })
    });

    assert_eq!(summarise_with_fallback(&summarizer, "prompt").await, None);
}

#[tokio::test]
async fn blank_summaries_are_dropped_and_others_trimmed() {
    let blank = StubSummarizer::new("   ");
    let padded = StubSummarizer::new("\n Shipped two fixes. \n");

    assert_eq!(summarise_with_fallback(&blank, "prompt").await, None);
    assert_eq!(
        summarise_with_fallback(&padded, "prompt").await.as_deref(),
        Some("Shipped two fixes.")
    );
}

#[rstest]
#[case::short("short", 10, "short")]
#[case::exact("0123456789", 10, "0123456789")]
#[case::long("0123456789abc", 10, "0123456789...")]
fn messages_are_truncated(#[case] input: &str, #[case] max: usize, #[case] expected: &str) {
    assert_eq!(truncate_for_message(input, max), expected);
}
