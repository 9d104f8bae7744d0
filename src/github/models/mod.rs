//! Data models representing merged pull requests.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types. A pull request is built once from
//! API data and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::IntakeError;
use super::locator::RepositoryRef;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Lifecycle state reported by GitHub for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Still open.
    Open,
    /// Closed, whether merged or not.
    Closed,
}

impl LifecycleState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Pull request as consumed by the collector, renderer, and summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Repository the pull request belongs to.
    pub repository: RepositoryRef,
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: String,
    /// Description body; empty when GitHub returns none.
    pub body: String,
    /// Author login if the account still exists.
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Merge timestamp; absent for pull requests closed without merging.
    pub merged_at: Option<DateTime<Utc>>,
    /// Label names in the order GitHub lists them.
    pub labels: Vec<String>,
    /// HTML URL for displaying to a user.
    pub url: String,
    /// Lifecycle state.
    pub state: LifecycleState,
}

impl PullRequest {
    /// Returns true when the pull request has been merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: String,
}

impl TryFrom<ApiRepository> for RepositoryRef {
    type Error = IntakeError;

    fn try_from(value: ApiRepository) -> Result<Self, Self::Error> {
        Self::parse(&value.full_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) state: LifecycleState,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
    pub(crate) merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) labels: Vec<ApiLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabel {
    pub(crate) name: String,
}

impl ApiPullRequest {
    pub(crate) fn into_pull_request(self, repository: &RepositoryRef) -> PullRequest {
        PullRequest {
            repository: repository.clone(),
            number: self.number,
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            author: self.user.and_then(|user| user.login),
            created_at: self.created_at,
            updated_at: self.updated_at,
            merged_at: self.merged_at,
            labels: self.labels.into_iter().map(|label| label.name).collect(),
            url: self.html_url.unwrap_or_default(),
            state: self.state,
        }
    }
}
