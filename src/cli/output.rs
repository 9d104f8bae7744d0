//! Delivery of rendered text to stdout or a file.

use std::io::Write;

use camino::Utf8Path;
use prtool::IntakeError;
use prtool::files;
use tracing::info;

pub(crate) fn io_error(error: &std::io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}

/// Writes `rendered` to `output` when set, otherwise to `writer`.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the file or writer rejects the text.
pub fn deliver<W: Write>(
    output: Option<&Utf8Path>,
    rendered: &str,
    writer: &mut W,
) -> Result<(), IntakeError> {
    match output {
        Some(path) => {
            files::write(path, rendered, "output file")?;
            info!(path = %path, "report written");
            Ok(())
        }
        None => writer
            .write_all(rendered.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| io_error(&e)),
    }
}
