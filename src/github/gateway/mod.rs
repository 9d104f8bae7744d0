//! Gateways for listing repositories and pull requests through Octocrab.
//!
//! The enumerator and collector depend only on the [`RepositoryLister`] and
//! [`PullRequestLister`] capabilities. [`OctocrabGateway`] implements both
//! over the REST API; [`RecordingGateway`] is an in-memory double for tests.

mod client;
mod error_mapping;
mod pull_request;
#[cfg(any(test, feature = "test-support"))]
mod recording;
mod repository;

#[cfg(test)]
mod tests;

pub use client::OctocrabGateway;
#[cfg(any(test, feature = "test-support"))]
pub use recording::{GatewayCall, RecordingGateway};

use async_trait::async_trait;

use super::error::IntakeError;
use super::locator::{RepositoryOwner, RepositoryRef, TeamRef};
use super::models::{LifecycleState, PullRequest};
use super::pagination::{PageRequest, Paginated};

/// Parameters for listing pull requests of one repository.
///
/// Results are always sorted by most recent update first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPullRequestsParams {
    /// State filter sent to GitHub.
    pub state: LifecycleState,
    /// Page to fetch.
    pub page: PageRequest,
}

impl ListPullRequestsParams {
    /// Closed pull requests on the given page; merged ones are among them.
    #[must_use]
    pub const fn closed(page: PageRequest) -> Self {
        Self {
            state: LifecycleState::Closed,
            page,
        }
    }
}

impl Default for ListPullRequestsParams {
    fn default() -> Self {
        Self::closed(PageRequest::default())
    }
}

/// Gateway for resolving which repositories a scope covers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    /// List one page of an organization's repositories.
    async fn list_org_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError>;

    /// List one page of a user's repositories.
    async fn list_user_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError>;

    /// Confirm that a single repository exists, returning its canonical name.
    async fn get_repository(&self, repository: &RepositoryRef) -> Result<RepositoryRef, IntakeError>;

    /// List one page of the repositories a team has access to.
    async fn list_team_repositories(
        &self,
        team: &TeamRef,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError>;
}

/// Gateway for listing the pull requests of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestLister: Send + Sync {
    /// List one page of pull requests, most recently updated first.
    async fn list_pull_requests(
        &self,
        repository: &RepositoryRef,
        params: &ListPullRequestsParams,
    ) -> Result<Paginated<PullRequest>, IntakeError>;
}
