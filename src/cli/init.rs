//! `prtool init`: annotated configuration file generation.

use std::io::{self, Write};

use camino::Utf8Path;
use prtool::IntakeError;
use prtool::files;

use super::output::io_error;

/// Annotated configuration listing every option with its default.
pub const TEMPLATE: &str = r#"# prtool configuration file
# Values here are overridden by PRTOOL_* environment variables, which are
# overridden by command-line flags.

# GitHub personal access token.
# Environment variable: PRTOOL_GITHUB_TOKEN (GITHUB_TOKEN is used as a fallback)
github_token: ""

# GitHub API base URL; change for GitHub Enterprise.
# Environment variable: PRTOOL_GITHUB_API_URL
github_api_url: "https://api.github.com"

# Scope: set exactly ONE of org, team, user, or repo.
# Environment variables: PRTOOL_ORG, PRTOOL_TEAM, PRTOOL_USER, PRTOOL_REPO
org: ""
# One or more teams as org/team, comma-separated.
team: ""
user: ""
# A single repository as owner/repo.
repo: ""

# How far back to look for merged pull requests: -7d, -2w, -1m, -1y.
# Environment variable: PRTOOL_SINCE
since: "-7d"

# Summarizer provider: stub, openai, or ollama.
# Environment variable: PRTOOL_LLM_PROVIDER
llm_provider: "stub"

# API key for the provider; required for openai.
# Environment variable: PRTOOL_LLM_API_KEY
llm_api_key: ""

# Model name, e.g. gpt-4o-mini for openai or llama3.2 for ollama.
# Environment variable: PRTOOL_LLM_MODEL
llm_model: ""

# Provider base URL; leave empty for the provider default.
# Environment variable: PRTOOL_LLM_BASE_URL
llm_base_url: ""

# File whose contents replace the built-in summary prompt.
# Environment variable: PRTOOL_PROMPT
prompt: ""

# Write the report here instead of stdout.
# Environment variable: PRTOOL_OUTPUT
output: ""

# Write logs here instead of stderr.
# Environment variable: PRTOOL_LOG_FILE
log_file: ""

# Repositories fetched at once.
# Environment variable: PRTOOL_MAX_CONCURRENCY
max_concurrency: 4

# Print matching pull requests as a table and skip the summary.
# Environment variable: PRTOOL_DRY_RUN
dry_run: false

# Log progress.
# Environment variable: PRTOOL_VERBOSE
verbose: false

# Plain logs without timestamps or colour.
# Environment variable: PRTOOL_CI
ci: false
"#;

/// Writes the template to `path` and reports where it went.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when `path` already exists and
/// [`IntakeError::Io`] when it cannot be written.
pub fn run(path: &Utf8Path) -> Result<(), IntakeError> {
    let mut stdout = io::stdout().lock();
    run_with_writer(path, &mut stdout)
}

/// Writes the template to `path`, reporting to `writer`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_writer<W: Write>(path: &Utf8Path, writer: &mut W) -> Result<(), IntakeError> {
    files::write_new(path, TEMPLATE, "config file")?;
    writeln!(writer, "Configuration file created: {path}").map_err(|e| io_error(&e))?;
    writeln!(writer, "Edit this file to customise your prtool settings.").map_err(|e| io_error(&e))
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};
    use prtool::IntakeError;
    use prtool::config::{EffectiveConfig, PartialConfig, load_file, merge};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::run_with_writer;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("temp dir should be created")
    }

    fn target(dir: &TempDir) -> Utf8PathBuf {
        Utf8Path::from_path(dir.path())
            .expect("temp dir should be UTF-8")
            .join(".prtool.yaml")
    }

    #[rstest]
    fn template_loads_to_the_defaults(temp_dir: TempDir) {
        let path = target(&temp_dir);
        let mut buffer = Vec::new();

        run_with_writer(&path, &mut buffer).expect("init should succeed");

        let layer = load_file(&path).expect("template should parse");
        let merged = merge(&PartialConfig::default(), &PartialConfig::default(), &layer)
            .expect("template should merge");
        assert_eq!(merged, EffectiveConfig::default());

        let message = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(message.contains("Configuration file created:"));
    }

    #[rstest]
    fn existing_file_is_left_alone(temp_dir: TempDir) {
        let path = target(&temp_dir);
        std::fs::write(&path, "org: acme\n").expect("config should be written");

        let result = run_with_writer(&path, &mut Vec::new());

        assert!(
            matches!(&result, Err(IntakeError::Configuration { message }) if message.contains("already exists")),
            "expected Configuration error, got {result:?}"
        );
        assert_eq!(
            std::fs::read_to_string(&path).expect("config should exist"),
            "org: acme\n"
        );
    }
}
