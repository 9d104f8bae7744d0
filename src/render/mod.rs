//! Markdown output for a retrieval run.
//!
//! [`write_markdown`] produces the full report: a front-matter block, the
//! optional summary, pull requests grouped by repository, and the list of
//! repositories that were skipped. [`write_table`] produces the compact
//! dry-run table.

mod table;

pub use table::{render_table, write_table};

use std::io::Write;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::collect::RepositoryWarning;
use crate::config::LlmSettings;
use crate::github::error::IntakeError;
use crate::github::models::PullRequest;
use crate::intake::FetchReport;

/// Report header values written as front matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Scope kind, e.g. `organization`.
    pub scope: String,
    /// Scope value, e.g. `acme`.
    pub scope_value: String,
    /// The `since` expression.
    pub since: String,
    /// The resolved cutoff.
    pub cutoff: DateTime<Utc>,
    /// Repositories that were queried, in enumeration order.
    pub repositories: Vec<String>,
    /// Summarizer provider name.
    pub llm_provider: String,
    /// Summarizer model override, if any.
    pub llm_model: Option<String>,
}

impl ReportMetadata {
    /// Collects the metadata of `report`.
    #[must_use]
    pub fn from_report(report: &FetchReport, llm: &LlmSettings, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            scope: report.scope.kind().to_owned(),
            scope_value: report.scope.value(),
            since: report.since.clone(),
            cutoff: report.cutoff.instant(),
            repositories: report.repositories.iter().map(ToString::to_string).collect(),
            llm_provider: llm.provider.clone(),
            llm_model: llm.model.clone(),
        }
    }
}

fn io_error(error: &std::io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_front_matter<W: Write>(
    writer: &mut W,
    metadata: &ReportMetadata,
    total: usize,
) -> Result<(), IntakeError> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer, "generated_at: {}", metadata.generated_at.to_rfc3339())
        .map_err(|e| io_error(&e))?;
    writeln!(writer, "scope: {}", metadata.scope).map_err(|e| io_error(&e))?;
    writeln!(writer, "scope_value: {}", quoted(&metadata.scope_value)).map_err(|e| io_error(&e))?;
    writeln!(writer, "since: {}", quoted(&metadata.since)).map_err(|e| io_error(&e))?;
    writeln!(writer, "cutoff: {}", metadata.cutoff.to_rfc3339()).map_err(|e| io_error(&e))?;
    writeln!(writer, "total_prs: {total}").map_err(|e| io_error(&e))?;
    writeln!(writer, "repositories:").map_err(|e| io_error(&e))?;
    for repository in &metadata.repositories {
        writeln!(writer, "  - {repository}").map_err(|e| io_error(&e))?;
    }
    writeln!(writer, "llm_provider: {}", metadata.llm_provider).map_err(|e| io_error(&e))?;
    if let Some(model) = &metadata.llm_model {
        writeln!(writer, "llm_model: {}", quoted(model)).map_err(|e| io_error(&e))?;
    }
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn write_pull_request<W: Write>(writer: &mut W, pull_request: &PullRequest) -> Result<(), IntakeError> {
    let author = pull_request.author.as_deref().unwrap_or("unknown");
    let merged = pull_request
        .merged_at
        .map(|merged_at| merged_at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    writeln!(
        writer,
        "- [#{} {}]({}) by @{author} (merged {merged})",
        pull_request.number, pull_request.title, pull_request.url
    )
    .map_err(|e| io_error(&e))?;

    if !pull_request.labels.is_empty() {
        writeln!(writer, "  Labels: {}", pull_request.labels.join(", ")).map_err(|e| io_error(&e))?;
    }

    let body = pull_request.body.trim();
    if !body.is_empty() {
        writeln!(writer).map_err(|e| io_error(&e))?;
        for line in body.lines() {
            writeln!(writer, "  {line}").map_err(|e| io_error(&e))?;
        }
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_pull_requests<W: Write>(
    writer: &mut W,
    pull_requests: &[PullRequest],
) -> Result<(), IntakeError> {
    writeln!(writer, "## Pull Requests").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    if pull_requests.is_empty() {
        writeln!(writer, "_No merged pull requests in this window._").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
        return Ok(());
    }

    let mut grouped: IndexMap<String, Vec<&PullRequest>> = IndexMap::new();
    for pull_request in pull_requests {
        grouped
            .entry(pull_request.repository.to_string())
            .or_default()
            .push(pull_request);
    }

    for (repository, entries) in &grouped {
        writeln!(writer, "### {repository}").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
        for pull_request in entries {
            write_pull_request(writer, pull_request)?;
        }
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_warnings<W: Write>(writer: &mut W, warnings: &[RepositoryWarning]) -> Result<(), IntakeError> {
    if warnings.is_empty() {
        return Ok(());
    }
    writeln!(writer, "## Warnings").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    for warning in warnings {
        writeln!(writer, "- {}: {}", warning.repository, warning.error).map_err(|e| io_error(&e))?;
    }
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes the markdown report.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(
    writer: &mut W,
    metadata: &ReportMetadata,
    summary: Option<&str>,
    pull_requests: &[PullRequest],
    warnings: &[RepositoryWarning],
) -> Result<(), IntakeError> {
    write_front_matter(writer, metadata, pull_requests.len())?;
    writeln!(writer, "# Merged Pull Requests").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    if let Some(text) = summary {
        writeln!(writer, "## Summary").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "{text}").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }

    write_pull_requests(writer, pull_requests)?;
    write_warnings(writer, warnings)
}

/// Renders the markdown report to a string.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if the rendered bytes are not UTF-8.
pub fn render_markdown(
    metadata: &ReportMetadata,
    summary: Option<&str>,
    pull_requests: &[PullRequest],
    warnings: &[RepositoryWarning],
) -> Result<String, IntakeError> {
    let mut buffer = Vec::new();
    write_markdown(&mut buffer, metadata, summary, pull_requests, warnings)?;
    String::from_utf8(buffer).map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })
}
