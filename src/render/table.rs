//! Dry-run table of matching pull requests.

use std::io::Write;

use super::io_error;
use crate::github::error::IntakeError;
use crate::github::models::PullRequest;

fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Writes one markdown table row per pull request.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing to the output fails.
pub fn write_table<W: Write>(writer: &mut W, pull_requests: &[PullRequest]) -> Result<(), IntakeError> {
    writeln!(writer, "| Repository | # | Title | Author | Merged |").map_err(|e| io_error(&e))?;
    writeln!(writer, "|------------|---|-------|--------|--------|").map_err(|e| io_error(&e))?;
    for pull_request in pull_requests {
        let merged = pull_request
            .merged_at
            .map(|merged_at| merged_at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(
            writer,
            "| {} | {} | {} | {} | {merged} |",
            pull_request.repository,
            pull_request.number,
            cell(&pull_request.title),
            cell(pull_request.author.as_deref().unwrap_or("unknown")),
        )
        .map_err(|e| io_error(&e))?;
    }
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{} pull request(s)", pull_requests.len()).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Renders the dry-run table to a string.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if the rendered bytes are not UTF-8.
pub fn render_table(pull_requests: &[PullRequest]) -> Result<String, IntakeError> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, pull_requests)?;
    String::from_utf8(buffer).map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })
}
