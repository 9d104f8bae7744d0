//! YAML configuration file layer.

use camino::{Utf8Path, Utf8PathBuf};

use super::PartialConfig;
use crate::files;
use crate::github::error::IntakeError;

/// File name of the per-user configuration file.
pub const CONFIG_FILE_NAME: &str = ".prtool.yaml";

/// Returns `~/.prtool.yaml` for the given home directory.
#[must_use]
pub fn default_config_path(home: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
    home.map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Expands a leading `~` to the home directory.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the path starts with `~` but
/// no home directory is known.
pub fn expand_home(path: &str, home: Option<&Utf8Path>) -> Result<Utf8PathBuf, IntakeError> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(Utf8PathBuf::from(path)),
    };

    let home_dir = home.ok_or_else(|| IntakeError::Configuration {
        message: format!("cannot expand '{path}': home directory is unknown"),
    })?;

    if rest.is_empty() {
        Ok(home_dir.to_path_buf())
    } else {
        Ok(home_dir.join(rest))
    }
}

/// Loads the file layer from `path`.
///
/// A missing file yields an empty layer; an empty file does too.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the file cannot be read or is
/// not valid YAML for the configuration fields.
pub fn load_file(path: &Utf8Path) -> Result<PartialConfig, IntakeError> {
    match read(path)? {
        Some(contents) => parse(path, &contents),
        None => Ok(PartialConfig::default()),
    }
}

/// Loads a file named explicitly with `--config`, which must exist.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the file is missing,
/// unreadable, or not valid YAML for the configuration fields.
pub fn load_explicit_file(path: &Utf8Path) -> Result<PartialConfig, IntakeError> {
    let contents = read(path)?.ok_or_else(|| IntakeError::Configuration {
        message: format!("config file '{path}' does not exist"),
    })?;
    parse(path, &contents)
}

fn read(path: &Utf8Path) -> Result<Option<String>, IntakeError> {
    files::read_optional(path, "config file").map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

fn parse(path: &Utf8Path, contents: &str) -> Result<PartialConfig, IntakeError> {
    if contents
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
    {
        return Ok(PartialConfig::default());
    }

    serde_yaml::from_str::<Option<PartialConfig>>(contents)
        .map(Option::unwrap_or_default)
        .map_err(|error| IntakeError::Configuration {
            message: format!("failed to parse config file '{path}': {error}"),
        })
}
