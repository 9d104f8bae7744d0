//! UTF-8 path file access through `cap-std` ambient directories.
//!
//! Every helper opens the parent directory with ambient authority and then
//! operates on the file name relative to that handle.

use std::io::{self, Write};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::{Dir, File};

use crate::github::error::IntakeError;

fn split_path<'a>(path: &'a Utf8Path, label: &str) -> Result<(&'a Utf8Path, &'a str), IntakeError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| IntakeError::Io {
        message: format!("invalid {label} path '{path}': no file name"),
    })?;
    Ok((parent, file_name))
}

fn open_dir_error(parent: &Utf8Path, label: &str, error: &io::Error) -> IntakeError {
    IntakeError::Io {
        message: format!("failed to open {label} directory '{parent}': {error}"),
    }
}

fn open_parent<'a>(path: &'a Utf8Path, label: &str) -> Result<(Dir, &'a str), IntakeError> {
    let (parent, file_name) = split_path(path, label)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| open_dir_error(parent, label, &error))?;
    Ok((dir, file_name))
}

/// Reads a file, returning `None` when it or its directory does not exist.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] for any failure other than a missing file.
pub fn read_optional(path: &Utf8Path, label: &str) -> Result<Option<String>, IntakeError> {
    let (parent, file_name) = split_path(path, label)?;
    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(open_dir_error(parent, label, &error)),
    };

    match dir.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(IntakeError::Io {
            message: format!("failed to read {label} '{path}': {error}"),
        }),
    }
}

/// Reads a file that must exist.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the file cannot be opened or read.
pub fn read_required(path: &Utf8Path, label: &str) -> Result<String, IntakeError> {
    let (dir, file_name) = open_parent(path, label)?;
    dir.read_to_string(file_name).map_err(|error| IntakeError::Io {
        message: format!("failed to read {label} '{path}': {error}"),
    })
}

/// Writes `contents` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the directory cannot be opened or the
/// write fails.
pub fn write(path: &Utf8Path, contents: &str, label: &str) -> Result<(), IntakeError> {
    let (dir, file_name) = open_parent(path, label)?;
    dir.write(file_name, contents).map_err(|error| IntakeError::Io {
        message: format!("failed to write {label} '{path}': {error}"),
    })
}

/// Creates `path` with `contents`, refusing to replace an existing file.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the file already exists and
/// [`IntakeError::Io`] for other failures.
pub fn write_new(path: &Utf8Path, contents: &str, label: &str) -> Result<(), IntakeError> {
    let (dir, file_name) = open_parent(path, label)?;
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    let mut file = dir
        .open_with(file_name, &options)
        .map_err(|error| match error.kind() {
            io::ErrorKind::AlreadyExists => IntakeError::Configuration {
                message: format!("{label} '{path}' already exists; remove it first to regenerate"),
            },
            _ => IntakeError::Io {
                message: format!("failed to create {label} '{path}': {error}"),
            },
        })?;

    file.write_all(contents.as_bytes())
        .map_err(|error| IntakeError::Io {
            message: format!("failed to write {label} '{path}': {error}"),
        })
}

/// Opens `path` for appending, creating it when missing.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the directory or file cannot be opened.
pub fn open_append(path: &Utf8Path, label: &str) -> Result<File, IntakeError> {
    let (dir, file_name) = open_parent(path, label)?;
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    dir.open_with(file_name, &options)
        .map_err(|error| IntakeError::Io {
            message: format!("failed to open {label} '{path}': {error}"),
        })
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{open_append, read_optional, read_required, write, write_new};
    use crate::github::error::IntakeError;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("temp dir should be created")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8Path::from_path(dir.path())
            .expect("temp dir should be UTF-8")
            .to_path_buf()
    }

    #[rstest]
    fn missing_file_reads_as_none(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("absent.yaml");
        assert_eq!(read_optional(&path, "config file"), Ok(None));
    }

    #[rstest]
    fn missing_directory_reads_as_none(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("nested").join("absent.yaml");
        assert_eq!(read_optional(&path, "config file"), Ok(None));
    }

    #[rstest]
    fn written_contents_round_trip(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("report.md");
        write(&path, "# Report\n", "output file").expect("write should succeed");
        assert_eq!(
            read_required(&path, "output file").as_deref(),
            Ok("# Report\n")
        );
    }

    #[rstest]
    fn write_new_refuses_to_overwrite(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join(".prtool.yaml");
        write_new(&path, "org: acme\n", "config file").expect("first write should succeed");

        let result = write_new(&path, "org: other\n", "config file");
        assert!(
            matches!(&result, Err(IntakeError::Configuration { message }) if message.contains("already exists")),
            "expected Configuration error, got {result:?}"
        );
        assert_eq!(
            read_required(&path, "config file").as_deref(),
            Ok("org: acme\n"),
            "original contents must be preserved"
        );
    }

    #[rstest]
    fn read_required_reports_missing_file(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("prompt.txt");
        let result = read_required(&path, "prompt file");
        assert!(
            matches!(&result, Err(IntakeError::Io { message }) if message.contains("prompt file")),
            "expected Io error, got {result:?}"
        );
    }

    #[rstest]
    fn append_keeps_existing_lines(temp_dir: TempDir) {
        use std::io::Write as _;

        let path = utf8(&temp_dir).join("prtool.log");
        for line in ["first\n", "second\n"] {
            let mut file = open_append(&path, "log file").expect("log file should open");
            file.write_all(line.as_bytes()).expect("append should succeed");
        }

        assert_eq!(
            read_required(&path, "log file").as_deref(),
            Ok("first\nsecond\n")
        );
    }
}
