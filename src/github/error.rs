//! Error types exposed by the retrieval pipeline.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;
use crate::time_window::TimeWindowError;

/// Errors surfaced while resolving configuration or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// No configuration object was supplied to the scope validator.
    #[error("configuration is required")]
    ConfigurationRequired,

    /// None of the scope selectors was set.
    #[error("exactly one of --org, --team, --user, or --repo must be specified")]
    NoScopeSpecified,

    /// More than one scope selector was set.
    #[error(
        "only one of --org, --team, --user, or --repo can be specified (found: {})",
        .scopes.join(", ")
    )]
    MultipleScopesSpecified {
        /// Names of every scope selector that was set.
        scopes: Vec<String>,
    },

    /// The `since` expression could not be resolved.
    #[error(transparent)]
    TimeWindow(#[from] TimeWindowError),

    /// The authentication token was missing.
    #[error("GitHub token is required (use --github-token, PRTOOL_GITHUB_TOKEN, or GITHUB_TOKEN)")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The scope resolved to zero repositories.
    #[error("no repositories found for {scope}")]
    NoRepositoriesFound {
        /// Human-readable scope description, e.g. `organization acme`.
        scope: String,
    },

    /// Fetching pull requests for one repository failed.
    #[error("failed to fetch pull requests for {repository}: {message}")]
    RepositoryFetchFailed {
        /// Repository in `owner/name` form.
        repository: String,
        /// Underlying failure description.
        message: String,
    },

    /// A repository identifier did not match `owner/name`.
    #[error("invalid repository '{input}': expected owner/repo")]
    InvalidRepository {
        /// The rejected identifier.
        input: String,
    },

    /// A team identifier did not match `org/team`.
    #[error("invalid team '{input}': expected org/team")]
    InvalidTeam {
        /// The rejected identifier.
        input: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling an upstream service.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from the rate limit endpoint.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or merged.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
