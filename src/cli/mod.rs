//! Command-line surface.
//!
//! Running `prtool` with scope and window flags produces a report
//! ([`report`]); `prtool init` writes an annotated configuration file
//! ([`init`]). Output helpers live in [`output`].

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use prtool::config::{CONFIG_FILE_NAME, PartialConfig};
use prtool::IntakeError;

pub mod init;
pub mod output;
pub mod report;

/// Summarise merged GitHub pull requests for an organization, team, user, or
/// repository.
#[derive(Debug, Default, Parser)]
#[command(name = "prtool", version, about)]
pub struct Cli {
    /// Subcommand; a report is generated when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (default is ~/.prtool.yaml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// GitHub personal access token.
    #[arg(short = 't', long, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// GitHub organization.
    #[arg(short = 'o', long)]
    pub org: Option<String>,

    /// GitHub team as org/team; repeat or comma-separate for several.
    #[arg(short = 'T', long = "team", value_name = "ORG/TEAM")]
    pub teams: Vec<String>,

    /// GitHub user.
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// GitHub repository as owner/repo.
    #[arg(short = 'r', long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Time range, e.g. -7d, -2w, -1m, -1y.
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub since: Option<String>,

    /// Summarizer provider: stub, openai, or ollama.
    #[arg(short = 'p', long, value_name = "PROVIDER")]
    pub llm_provider: Option<String>,

    /// Summarizer API key.
    #[arg(short = 'k', long, value_name = "KEY")]
    pub llm_api_key: Option<String>,

    /// Summarizer model name.
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// Summarizer base URL.
    #[arg(short = 'b', long, value_name = "URL")]
    pub llm_base_url: Option<String>,

    /// File whose contents replace the built-in prompt.
    #[arg(short = 'P', long, value_name = "PATH")]
    pub prompt: Option<String>,

    /// Write the report here instead of stdout.
    #[arg(short = 'O', long, value_name = "PATH")]
    pub output: Option<String>,

    /// Write logs here instead of stderr.
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise.
    #[arg(short = 'g', long, value_name = "URL")]
    pub github_api_url: Option<String>,

    /// Repositories fetched at once.
    #[arg(short = 'c', long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Print matching pull requests as a table and skip the summary.
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Log progress.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Plain logs for CI.
    #[arg(short = 'C', long)]
    pub ci: bool,
}

/// Subcommands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Generate an annotated configuration file.
    Init {
        /// Where to write the file.
        #[arg(long, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
        path: Utf8PathBuf,
    },
}

impl Cli {
    /// The command-line configuration layer.
    ///
    /// Flags contribute only when passed, so an unset flag never overrides
    /// a value from the environment or file.
    #[must_use]
    pub fn layer(&self) -> PartialConfig {
        PartialConfig {
            github_token: self.github_token.clone(),
            org: self.org.clone(),
            team: (!self.teams.is_empty()).then(|| self.teams.join(",")),
            user: self.user.clone(),
            repo: self.repo.clone(),
            since: self.since.clone(),
            llm_provider: self.llm_provider.clone(),
            llm_api_key: self.llm_api_key.clone(),
            llm_model: self.llm_model.clone(),
            llm_base_url: self.llm_base_url.clone(),
            prompt: self.prompt.clone(),
            output: self.output.clone(),
            log_file: self.log_file.clone(),
            github_api_url: self.github_api_url.clone(),
            max_concurrency: self.max_concurrency,
            dry_run: self.dry_run.then_some(true),
            verbose: self.verbose.then_some(true),
            ci: self.ci.then_some(true),
            legacy_github_token: None,
        }
    }
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns the first [`IntakeError`] raised by the selected operation.
pub async fn run(args: &Cli) -> Result<(), IntakeError> {
    match &args.command {
        Some(Command::Init { path }) => init::run(path),
        None => report::run(args).await,
    }
}
