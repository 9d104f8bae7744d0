//! Report generation: load configuration, fetch, summarise, render, deliver.

use std::env;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use prtool::config::{
    EffectiveConfig, PartialConfig, default_config_path, expand_home, from_process_env,
    load_explicit_file, load_file, merge,
};
use prtool::github::{PullRequestLister, RepositoryLister};
use prtool::logging::{self, LogOptions};
use prtool::render::{ReportMetadata, render_markdown, render_table};
use prtool::summary::{
    build_context, build_prompt, load_instructions, select, summarise_with_fallback,
};
use prtool::{
    FetchReport, IntakeError, OctocrabGateway, PersonalAccessToken, PullRequest, RetrievalIntake,
};
use tracing::info;
use url::Url;

use super::Cli;
use super::output::deliver;

/// Generates a report from the process configuration.
///
/// # Errors
///
/// Returns [`IntakeError`] for configuration, GitHub, or output failures.
pub async fn run(args: &Cli) -> Result<(), IntakeError> {
    let home = home_dir();
    let environment = from_process_env()?;
    let config = load_config(args, &environment, home.as_deref())?;
    logging::init(&LogOptions::from_config(&config))?;

    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(&config, OctocrabGateway::for_token, Utc::now(), &mut stdout).await
}

fn home_dir() -> Option<Utf8PathBuf> {
    env::var("HOME")
        .ok()
        .filter(|home| !home.trim().is_empty())
        .map(Utf8PathBuf::from)
}

/// Merges the command line, `environment`, and the config file.
///
/// The file is the one named by `--config`, which must exist, or
/// `~/.prtool.yaml`, which may be absent.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when a layer cannot be read or the
/// merged values are invalid.
pub fn load_config(
    args: &Cli,
    environment: &PartialConfig,
    home: Option<&Utf8Path>,
) -> Result<EffectiveConfig, IntakeError> {
    let file = match args.config.as_deref() {
        Some(path) => load_explicit_file(&expand_home(path, home)?)?,
        None => match default_config_path(home) {
            Some(path) => load_file(&path)?,
            None => PartialConfig::default(),
        },
    };

    merge(&args.layer(), environment, &file)?.with_expanded_paths(home)
}

/// Generates a report using a custom gateway builder.
///
/// The token and API base are checked before the builder runs.
///
/// # Errors
///
/// Returns [`IntakeError`] for configuration, GitHub, or output failures.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &EffectiveConfig,
    build_gateway: F,
    now: DateTime<Utc>,
    writer: &mut W,
) -> Result<(), IntakeError>
where
    G: RepositoryLister + PullRequestLister,
    F: FnOnce(&PersonalAccessToken, &Url) -> Result<G, IntakeError>,
    W: Write,
{
    let token = config.token()?;
    let api_base = config.api_base()?;
    let gateway = build_gateway(&token, &api_base)?;

    let report = RetrievalIntake::new(&gateway, &gateway)
        .fetch(config, now)
        .await?;

    let rendered = if config.dry_run {
        render_table(&report.collection.pull_requests)?
    } else {
        render_report(config, &report, now).await?
    };
    deliver(config.output.as_deref(), &rendered, writer)
}

async fn render_report(
    config: &EffectiveConfig,
    report: &FetchReport,
    now: DateTime<Utc>,
) -> Result<String, IntakeError> {
    let pull_requests = &report.collection.pull_requests;
    let summary = summarise(config, pull_requests).await?;
    let metadata = ReportMetadata::from_report(report, &config.llm, now);
    render_markdown(
        &metadata,
        summary.as_deref(),
        pull_requests,
        &report.collection.warnings,
    )
}

async fn summarise(
    config: &EffectiveConfig,
    pull_requests: &[PullRequest],
) -> Result<Option<String>, IntakeError> {
    if pull_requests.is_empty() {
        info!("no merged pull requests; skipping summary");
        return Ok(None);
    }

    let instructions = load_instructions(config.prompt.as_deref())?;
    let prompt = build_prompt(&instructions, &build_context(pull_requests));
    let summarizer = select(&config.llm);
    Ok(summarise_with_fallback(summarizer.as_ref(), &prompt).await)
}
