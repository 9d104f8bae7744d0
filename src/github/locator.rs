//! Identity wrappers for repositories, teams, and credentials.

use std::fmt;

use url::Url;

use super::error::IntakeError;

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::Configuration {
                message: "repository owner must not be empty".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryOwner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Canonical `owner/name` repository reference.
///
/// # Example
///
/// ```
/// use prtool::RepositoryRef;
///
/// let repo = RepositoryRef::parse("octo/hello-world").expect("should parse");
/// assert_eq!(repo.owner(), "octo");
/// assert_eq!(repo.name(), "hello-world");
/// assert_eq!(repo.to_string(), "octo/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parses an `owner/name` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidRepository`] unless the input holds
    /// exactly one `/` separating two non-empty parts.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let (owner, name) =
            split_pair(input).ok_or_else(|| IntakeError::InvalidRepository {
                input: input.to_owned(),
            })?;
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Repository owner login.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name without the owner.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/{}/pulls", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner, self.name)
    }
}

/// Team reference in `org/team-slug` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamRef {
    organization: String,
    slug: String,
}

impl TeamRef {
    /// Parses an `org/team` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidTeam`] unless the input holds exactly one
    /// `/` separating two non-empty parts.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let (organization, slug) = split_pair(input).ok_or_else(|| IntakeError::InvalidTeam {
            input: input.to_owned(),
        })?;
        Ok(Self {
            organization: organization.to_owned(),
            slug: slug.to_owned(),
        })
    }

    /// Organization owning the team.
    #[must_use]
    pub const fn organization(&self) -> &str {
        self.organization.as_str()
    }

    /// Team slug.
    #[must_use]
    pub const fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub(crate) fn repositories_path(&self) -> String {
        format!("/orgs/{}/teams/{}/repos", self.organization, self.slug)
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.organization, self.slug)
    }
}

fn split_pair(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim();
    let (left, right) = trimmed.split_once('/')?;
    if left.is_empty() || right.is_empty() || right.contains('/') {
        return None;
    }
    Some((left, right))
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Parses the GitHub API base URL, defaulting to the public API.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the URL cannot be parsed or
/// does not use HTTP(S).
pub fn parse_api_base(input: Option<&str>) -> Result<Url, IntakeError> {
    let raw = input
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_BASE);
    let parsed = Url::parse(raw).map_err(|error| IntakeError::Configuration {
        message: format!("GitHub API URL '{raw}' is invalid: {error}"),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(IntakeError::Configuration {
            message: format!("GitHub API URL '{raw}' must use http or https"),
        });
    }
    Ok(parsed)
}
