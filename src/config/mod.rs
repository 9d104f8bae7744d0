//! Application configuration merged from CLI, environment, and file layers.
//!
//! Each source produces a [`PartialConfig`]. [`merge`] folds them with
//! ortho-config's layered composer into one [`EffectiveConfig`].
//!
//! # Precedence
//!
//! Configuration values are resolved per field with the following precedence
//! (lowest to highest):
//!
//! 1. **Defaults** – `since = -7d`, the public GitHub API, four concurrent
//!    repository fetches, and the `stub` summarizer
//! 2. **Configuration file** – `~/.prtool.yaml` or the path given with
//!    `--config`
//! 3. **Environment variables** – `PRTOOL_*`
//! 4. **Command-line arguments**
//!
//! Blank strings in any layer count as unset and fall through. When no layer
//! supplies a token, the legacy `GITHUB_TOKEN` variable is used.
//!
//! # Configuration File
//!
//! ```yaml
//! github_token: ghp_example
//! org: acme
//! since: -14d
//! llm_provider: openai
//! llm_api_key: sk-example
//! ```

mod environment;
mod file;

pub use environment::{from_env_with, from_process_env};
pub use file::{
    CONFIG_FILE_NAME, default_config_path, expand_home, load_explicit_file, load_file,
};

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{MergeComposer, OrthoConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::error::IntakeError;
use crate::github::locator::{DEFAULT_API_BASE, PersonalAccessToken, parse_api_base};
use crate::time_window::DEFAULT_SINCE;

/// Default number of repositories fetched concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Summarizer used when none is configured.
pub const DEFAULT_LLM_PROVIDER: &str = "stub";

/// One configuration source; every field is optional.
///
/// Flags are `Option<bool>` so that "not given" differs from "false".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    /// Personal access token for the GitHub API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    /// Organization scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Comma-separated `org/team` list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// User scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Single `owner/repo` scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Relative time window such as `-7d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Summarizer provider: `stub`, `openai`, or `ollama`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    /// API key for the summarizer provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_api_key: Option<String>,
    /// Model name passed to the summarizer provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    /// Base URL of the summarizer provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_base_url: Option<String>,
    /// Path to a file whose contents replace the built-in prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Path the report is written to instead of stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Path logs are written to instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    /// GitHub API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,
    /// Upper bound on repositories fetched at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// Print a table of matching pull requests instead of a report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// Log progress at `info` level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    /// Plain log output without timestamps or colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci: Option<bool>,
    /// Value of the legacy `GITHUB_TOKEN` variable; used only when no layer
    /// sets `github_token`.
    #[serde(skip)]
    pub legacy_github_token: Option<String>,
}

impl PartialConfig {
    /// Returns a copy with every string trimmed and blank strings removed.
    #[must_use]
    pub fn normalised(&self) -> Self {
        Self {
            github_token: non_blank(self.github_token.as_deref()),
            org: non_blank(self.org.as_deref()),
            team: non_blank(self.team.as_deref()),
            user: non_blank(self.user.as_deref()),
            repo: non_blank(self.repo.as_deref()),
            since: non_blank(self.since.as_deref()),
            llm_provider: non_blank(self.llm_provider.as_deref()),
            llm_api_key: non_blank(self.llm_api_key.as_deref()),
            llm_model: non_blank(self.llm_model.as_deref()),
            llm_base_url: non_blank(self.llm_base_url.as_deref()),
            prompt: non_blank(self.prompt.as_deref()),
            output: non_blank(self.output.as_deref()),
            log_file: non_blank(self.log_file.as_deref()),
            github_api_url: non_blank(self.github_api_url.as_deref()),
            max_concurrency: self.max_concurrency,
            dry_run: self.dry_run,
            verbose: self.verbose,
            ci: self.ci,
            legacy_github_token: non_blank(self.legacy_github_token.as_deref()),
        }
    }

    /// Serialises the normalised layer for the merge composer.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if serialisation fails.
    pub fn to_layer(&self) -> Result<serde_json::Value, IntakeError> {
        serde_json::to_value(self.normalised()).map_err(|error| IntakeError::Configuration {
            message: format!("failed to serialise configuration layer: {error}"),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}

/// Layered configuration as merged by ortho-config.
///
/// # Environment Variables
///
/// Every field maps to `PRTOOL_<FIELD>`, e.g. `PRTOOL_ORG` or
/// `PRTOOL_MAX_CONCURRENCY`. The environment layer is read by
/// [`from_env_with`] so that flags accept `true/false/1/0/yes/no`.
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "PRTOOL")]
pub struct PrtoolConfig {
    /// Personal access token for the GitHub API.
    #[ortho_config(cli_short = 't')]
    pub github_token: Option<String>,
    /// Organization scope.
    #[ortho_config(cli_short = 'o')]
    pub org: Option<String>,
    /// Comma-separated `org/team` list.
    #[ortho_config(cli_short = 'T')]
    pub team: Option<String>,
    /// User scope.
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,
    /// Single `owner/repo` scope.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,
    /// Relative time window.
    #[ortho_config(cli_short = 's')]
    pub since: String,
    /// Summarizer provider.
    #[ortho_config(cli_short = 'p')]
    pub llm_provider: String,
    /// Summarizer API key.
    #[ortho_config(cli_short = 'k')]
    pub llm_api_key: Option<String>,
    /// Summarizer model.
    #[ortho_config(cli_short = 'm')]
    pub llm_model: Option<String>,
    /// Summarizer base URL.
    #[ortho_config(cli_short = 'b')]
    pub llm_base_url: Option<String>,
    /// Prompt file path.
    #[ortho_config(cli_short = 'P')]
    pub prompt: Option<String>,
    /// Output file path.
    #[ortho_config(cli_short = 'O')]
    pub output: Option<String>,
    /// Log file path.
    #[ortho_config(cli_short = 'l')]
    pub log_file: Option<String>,
    /// GitHub API base URL.
    #[ortho_config(cli_short = 'g')]
    pub github_api_url: String,
    /// Upper bound on repositories fetched at once.
    #[ortho_config(cli_short = 'c')]
    pub max_concurrency: usize,
    /// Dry-run flag.
    #[ortho_config(cli_short = 'd')]
    pub dry_run: bool,
    /// Verbose flag.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
    /// CI flag.
    #[ortho_config(cli_short = 'C')]
    pub ci: bool,
}

impl Default for PrtoolConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            org: None,
            team: None,
            user: None,
            repo: None,
            since: DEFAULT_SINCE.to_owned(),
            llm_provider: DEFAULT_LLM_PROVIDER.to_owned(),
            llm_api_key: None,
            llm_model: None,
            llm_base_url: None,
            prompt: None,
            output: None,
            log_file: None,
            github_api_url: DEFAULT_API_BASE.to_owned(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dry_run: false,
            verbose: false,
            ci: false,
        }
    }
}

/// Summarizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Provider name, lower-cased.
    pub provider: String,
    /// API key, if any.
    pub api_key: Option<String>,
    /// Model override, if any.
    pub model: Option<String>,
    /// Base URL override, if any.
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_owned(),
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

/// Fully merged configuration for one run.
///
/// Scope exclusivity is enforced by [`crate::scope::validate`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Personal access token, if any layer supplied one.
    pub github_token: Option<String>,
    /// Organization scope.
    pub org: Option<String>,
    /// Team scope entries in `org/team` form.
    pub teams: Vec<String>,
    /// User scope.
    pub user: Option<String>,
    /// Repository scope in `owner/repo` form.
    pub repo: Option<String>,
    /// Relative time window.
    pub since: String,
    /// Summarizer settings.
    pub llm: LlmSettings,
    /// Prompt file path.
    pub prompt: Option<Utf8PathBuf>,
    /// Output file path; stdout when absent.
    pub output: Option<Utf8PathBuf>,
    /// Log file path; stderr when absent.
    pub log_file: Option<Utf8PathBuf>,
    /// GitHub API base URL.
    pub github_api_url: String,
    /// Upper bound on repositories fetched at once.
    pub max_concurrency: usize,
    /// Dry-run flag.
    pub dry_run: bool,
    /// Verbose flag.
    pub verbose: bool,
    /// CI flag.
    pub ci: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            org: None,
            teams: Vec::new(),
            user: None,
            repo: None,
            since: DEFAULT_SINCE.to_owned(),
            llm: LlmSettings::default(),
            prompt: None,
            output: None,
            log_file: None,
            github_api_url: DEFAULT_API_BASE.to_owned(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dry_run: false,
            verbose: false,
            ci: false,
        }
    }
}

impl EffectiveConfig {
    /// Returns the validated personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token was configured.
    pub fn token(&self) -> Result<PersonalAccessToken, IntakeError> {
        PersonalAccessToken::new(self.github_token.as_deref().unwrap_or_default())
    }

    /// Returns the parsed GitHub API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the URL is unusable.
    pub fn api_base(&self) -> Result<Url, IntakeError> {
        parse_api_base(Some(&self.github_api_url))
    }

    /// Expands a leading `~` in the prompt, output, and log file paths.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when a path starts with `~` but
    /// no home directory is known.
    pub fn with_expanded_paths(self, home: Option<&Utf8Path>) -> Result<Self, IntakeError> {
        let expand = |path: Option<Utf8PathBuf>| {
            path.map(|value| expand_home(value.as_str(), home)).transpose()
        };
        Ok(Self {
            prompt: expand(self.prompt)?,
            output: expand(self.output)?,
            log_file: expand(self.log_file)?,
            ..self
        })
    }

    fn from_merged(merged: PrtoolConfig, legacy_token: Option<String>) -> Result<Self, IntakeError> {
        if merged.max_concurrency == 0 {
            return Err(IntakeError::Configuration {
                message: "max_concurrency must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            github_token: merged.github_token.or(legacy_token),
            org: merged.org,
            teams: merged.team.as_deref().map(split_teams).unwrap_or_default(),
            user: merged.user,
            repo: merged.repo,
            since: merged.since,
            llm: LlmSettings {
                provider: merged.llm_provider.to_lowercase(),
                api_key: merged.llm_api_key,
                model: merged.llm_model,
                base_url: merged.llm_base_url,
            },
            prompt: merged.prompt.map(Utf8PathBuf::from),
            output: merged.output.map(Utf8PathBuf::from),
            log_file: merged.log_file.map(Utf8PathBuf::from),
            github_api_url: merged.github_api_url,
            max_concurrency: merged.max_concurrency,
            dry_run: merged.dry_run,
            verbose: merged.verbose,
            ci: merged.ci,
        })
    }
}

/// Splits a comma-separated team list, trimming entries and dropping blanks.
#[must_use]
pub fn split_teams(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn defaults_layer() -> Result<serde_json::Value, IntakeError> {
    serde_json::to_value(PrtoolConfig::default()).map_err(|error| IntakeError::Configuration {
        message: format!("failed to serialise configuration defaults: {error}"),
    })
}

/// Merges the three sources into one configuration.
///
/// Per field the CLI wins over the environment, which wins over the file,
/// which wins over the defaults.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the layers cannot be merged or
/// `max_concurrency` is zero.
pub fn merge(
    cli: &PartialConfig,
    environment: &PartialConfig,
    file: &PartialConfig,
) -> Result<EffectiveConfig, IntakeError> {
    let mut composer = MergeComposer::new();
    composer.push_defaults(defaults_layer()?);
    composer.push_file(file.to_layer()?, None);
    composer.push_environment(environment.to_layer()?);
    composer.push_cli(cli.to_layer()?);

    let merged = PrtoolConfig::merge_from_layers(composer.layers()).map_err(|error| {
        IntakeError::Configuration {
            message: error.to_string(),
        }
    })?;

    let legacy_token = [cli, environment, file]
        .into_iter()
        .find_map(|layer| non_blank(layer.legacy_github_token.as_deref()));

    EffectiveConfig::from_merged(merged, legacy_token)
}
