//! `tracing` subscriber installation for the binary.
//!
//! Logs go to stderr at `warn` by default, or to a log file when one is
//! configured. `--verbose` raises this crate to `info`; `RUST_LOG` replaces
//! the filter entirely. CI mode drops timestamps and colour.

use std::io;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::EffectiveConfig;
use crate::files;
use crate::github::error::IntakeError;

const QUIET_DIRECTIVE: &str = "warn";
const VERBOSE_DIRECTIVE: &str = "warn,prtool=info";

/// Output options for the subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Raise this crate's level to `info`.
    pub verbose: bool,
    /// Plain output for CI logs.
    pub ci: bool,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<Utf8PathBuf>,
}

impl LogOptions {
    /// Options taken from the merged configuration.
    #[must_use]
    pub fn from_config(config: &EffectiveConfig) -> Self {
        Self {
            verbose: config.verbose,
            ci: config.ci,
            log_file: config.log_file.clone(),
        }
    }

    /// Whether ANSI colour codes should be emitted.
    #[must_use]
    pub const fn ansi(&self) -> bool {
        !self.ci && self.log_file.is_none()
    }
}

/// Filter directive used when `RUST_LOG` is unset or blank.
#[must_use]
pub fn filter_directive(verbose: bool, rust_log: Option<&str>) -> String {
    rust_log
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .map_or_else(
            || {
                if verbose {
                    VERBOSE_DIRECTIVE.to_owned()
                } else {
                    QUIET_DIRECTIVE.to_owned()
                }
            },
            ToOwned::to_owned,
        )
}

fn make_writer(log_file: Option<&Utf8Path>) -> Result<BoxMakeWriter, IntakeError> {
    match log_file {
        Some(path) => {
            let file = files::open_append(path, "log file")?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(io::stderr)),
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the log file cannot be opened,
/// [`IntakeError::Configuration`] when the filter directive is invalid or a
/// subscriber is already installed.
pub fn init(options: &LogOptions) -> Result<(), IntakeError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(options.verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).map_err(|error| IntakeError::Configuration {
        message: format!("invalid log filter '{directive}': {error}"),
    })?;

    let base = fmt::layer()
        .with_writer(make_writer(options.log_file.as_deref())?)
        .with_ansi(options.ansi())
        .with_target(false);
    let output = if options.ci {
        base.without_time().with_filter(filter).boxed()
    } else {
        base.with_filter(filter).boxed()
    };

    tracing_subscriber::registry()
        .with(output)
        .try_init()
        .map_err(|error| IntakeError::Configuration {
            message: format!("failed to install log subscriber: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;

    use super::{LogOptions, filter_directive};
    use crate::config::EffectiveConfig;

    #[rstest]
    #[case::quiet(false, None, "warn")]
    #[case::verbose(true, None, "warn,prtool=info")]
    #[case::blank_rust_log(true, Some("  "), "warn,prtool=info")]
    #[case::rust_log_wins(false, Some("debug"), "debug")]
    fn directive_selection(
        #[case] verbose: bool,
        #[case] rust_log: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(filter_directive(verbose, rust_log), expected);
    }

    #[rstest]
    #[case::terminal(false, None, true)]
    #[case::ci(true, None, false)]
    #[case::file(false, Some("prtool.log"), false)]
    fn ansi_only_on_interactive_stderr(
        #[case] ci: bool,
        #[case] log_file: Option<&str>,
        #[case] expected: bool,
    ) {
        let options = LogOptions {
            verbose: false,
            ci,
            log_file: log_file.map(Utf8PathBuf::from),
        };
        assert_eq!(options.ansi(), expected);
    }

    #[rstest]
    fn options_follow_config() {
        let config = EffectiveConfig {
            verbose: true,
            ci: true,
            log_file: Some(Utf8PathBuf::from("/tmp/prtool.log")),
            ..EffectiveConfig::default()
        };

        let options = LogOptions::from_config(&config);

        assert!(options.verbose && options.ci);
        assert_eq!(
            options.log_file.as_deref().map(Utf8Path::as_str),
            Some("/tmp/prtool.log")
        );
    }
}
