//! Environment layer for `PRTOOL_*` variables.

use std::env;

use super::PartialConfig;
use crate::github::error::IntakeError;

const PREFIX: &str = "PRTOOL_";

/// Reads the environment layer from the process environment.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when `PRTOOL_MAX_CONCURRENCY` is
/// not a positive integer.
pub fn from_process_env() -> Result<PartialConfig, IntakeError> {
    from_env_with(|name| env::var(name).ok())
}

/// Reads the environment layer through `lookup`.
///
/// Flags accept `true/false/1/0/yes/no` in any case; other values are
/// ignored. `GITHUB_TOKEN` is captured separately as the legacy fallback.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when `PRTOOL_MAX_CONCURRENCY` is
/// not a positive integer.
pub fn from_env_with<F>(lookup: F) -> Result<PartialConfig, IntakeError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefixed = |name: &str| lookup(&format!("{PREFIX}{name}"));
    let flag = |name: &str| prefixed(name).as_deref().and_then(parse_flag);

    let max_concurrency = prefixed("MAX_CONCURRENCY")
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_concurrency(&raw))
        .transpose()?;

    Ok(PartialConfig {
        github_token: prefixed("GITHUB_TOKEN"),
        org: prefixed("ORG"),
        team: prefixed("TEAM"),
        user: prefixed("USER"),
        repo: prefixed("REPO"),
        since: prefixed("SINCE"),
        llm_provider: prefixed("LLM_PROVIDER"),
        llm_api_key: prefixed("LLM_API_KEY"),
        llm_model: prefixed("LLM_MODEL"),
        llm_base_url: prefixed("LLM_BASE_URL"),
        prompt: prefixed("PROMPT"),
        output: prefixed("OUTPUT"),
        log_file: prefixed("LOG_FILE"),
        github_api_url: prefixed("GITHUB_API_URL"),
        max_concurrency,
        dry_run: flag("DRY_RUN"),
        verbose: flag("VERBOSE"),
        ci: flag("CI"),
        legacy_github_token: lookup("GITHUB_TOKEN"),
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_concurrency(raw: &str) -> Result<usize, IntakeError> {
    raw.trim().parse::<usize>().map_err(|error| IntakeError::Configuration {
        message: format!("{PREFIX}MAX_CONCURRENCY must be a positive integer, got '{raw}': {error}"),
    })
}
