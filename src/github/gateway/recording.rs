//! In-memory gateway double with scripted pages and a call log.
//!
//! ```
//! use prtool::github::gateway::{GatewayCall, RecordingGateway, RepositoryLister};
//! use prtool::github::locator::RepositoryOwner;
//! use prtool::github::pagination::PageRequest;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gateway = RecordingGateway::default().with_org_pages("acme", &[&["acme/api"]]);
//! let owner = RepositoryOwner::new("acme").expect("owner");
//! let page = gateway
//!     .list_org_repositories(&owner, PageRequest::default())
//!     .await
//!     .expect("scripted page");
//! assert_eq!(page.items.len(), 1);
//! assert_eq!(
//!     gateway.calls(),
//!     vec![GatewayCall::OrgRepositories { owner: "acme".to_owned(), page: 1 }]
//! );
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{ListPullRequestsParams, PullRequestLister, RepositoryLister};
use crate::github::error::IntakeError;
use crate::github::locator::{RepositoryOwner, RepositoryRef, TeamRef};
use crate::github::models::{LifecycleState, PullRequest};
use crate::github::pagination::{PageRequest, Paginated};

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list_org_repositories`.
    OrgRepositories {
        /// Organization login.
        owner: String,
        /// Requested page.
        page: u32,
    },
    /// `list_user_repositories`.
    UserRepositories {
        /// User login.
        owner: String,
        /// Requested page.
        page: u32,
    },
    /// `get_repository`.
    Repository {
        /// Repository in `owner/name` form.
        repository: String,
    },
    /// `list_team_repositories`.
    TeamRepositories {
        /// Team in `org/slug` form.
        team: String,
        /// Requested page.
        page: u32,
    },
    /// `list_pull_requests`.
    PullRequests {
        /// Repository in `owner/name` form.
        repository: String,
        /// Requested page.
        page: u32,
        /// State filter sent with the request.
        state: LifecycleState,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Listing {
    Org(String),
    User(String),
    Team(String),
}

/// Scripted gateway implementing both listing capabilities.
///
/// Unscripted listings return one empty page. Unknown repositories fail
/// `get_repository` with a 404-style API error.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    listings: HashMap<Listing, Vec<Vec<String>>>,
    listing_failures: HashMap<Listing, IntakeError>,
    existing: HashSet<String>,
    pull_requests: HashMap<String, Vec<Vec<PullRequest>>>,
    pull_request_failures: HashMap<String, IntakeError>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingGateway {
    /// Scripts the repository pages of an organization.
    #[must_use]
    pub fn with_org_pages(mut self, owner: &str, pages: &[&[&str]]) -> Self {
        self.listings
            .insert(Listing::Org(owner.to_owned()), owned_pages(pages));
        self
    }

    /// Scripts the repository pages of a user.
    #[must_use]
    pub fn with_user_pages(mut self, owner: &str, pages: &[&[&str]]) -> Self {
        self.listings
            .insert(Listing::User(owner.to_owned()), owned_pages(pages));
        self
    }

    /// Scripts the repository pages of a team given as `org/slug`.
    #[must_use]
    pub fn with_team_pages(mut self, team: &str, pages: &[&[&str]]) -> Self {
        self.listings
            .insert(Listing::Team(team.to_owned()), owned_pages(pages));
        self
    }

    /// Makes an organization listing fail with `error`.
    #[must_use]
    pub fn with_org_failure(mut self, owner: &str, error: IntakeError) -> Self {
        self.listing_failures
            .insert(Listing::Org(owner.to_owned()), error);
        self
    }

    /// Registers a repository that `get_repository` can confirm.
    #[must_use]
    pub fn with_existing_repository(mut self, repository: &str) -> Self {
        self.existing.insert(repository.to_owned());
        self
    }

    /// Scripts the pull request pages of a repository.
    #[must_use]
    pub fn with_pull_request_pages(mut self, repository: &str, pages: Vec<Vec<PullRequest>>) -> Self {
        self.pull_requests.insert(repository.to_owned(), pages);
        self
    }

    /// Makes pull request listing for a repository fail with `error`.
    #[must_use]
    pub fn with_pull_request_failure(mut self, repository: &str, error: IntakeError) -> Self {
        self.pull_request_failures
            .insert(repository.to_owned(), error);
        self
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of pull request pages requested for `repository`.
    #[must_use]
    pub fn pull_request_pages_requested(&self, repository: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(call, GatewayCall::PullRequests { repository: name, .. } if name == repository)
            })
            .count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn repository_page(
        &self,
        listing: &Listing,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        request.validate()?;
        if let Some(error) = self.listing_failures.get(listing) {
            return Err(error.clone());
        }

        let pages = self.listings.get(listing).map_or(&[][..], Vec::as_slice);
        let (names, has_next) = select_page(pages, request);
        let items = names
            .iter()
            .map(|name| RepositoryRef::parse(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page_of(items, request, has_next))
    }
}

fn owned_pages(pages: &[&[&str]]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|page| page.iter().map(|name| (*name).to_owned()).collect())
        .collect()
}

fn select_page<T: Clone>(pages: &[Vec<T>], request: PageRequest) -> (Vec<T>, bool) {
    let index = usize::try_from(request.page().saturating_sub(1)).unwrap_or(usize::MAX);
    let items = pages.get(index).cloned().unwrap_or_default();
    let has_next = index.saturating_add(1) < pages.len();
    (items, has_next)
}

fn page_of<T>(items: Vec<T>, request: PageRequest, has_next: bool) -> Paginated<T> {
    if has_next {
        Paginated::with_next(items, request)
    } else {
        Paginated::last(items, request)
    }
}

#[async_trait]
impl RepositoryLister for RecordingGateway {
    async fn list_org_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        self.record(GatewayCall::OrgRepositories {
            owner: owner.to_string(),
            page: request.page(),
        });
        self.repository_page(&Listing::Org(owner.to_string()), request)
    }

    async fn list_user_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        self.record(GatewayCall::UserRepositories {
            owner: owner.to_string(),
            page: request.page(),
        });
        self.repository_page(&Listing::User(owner.to_string()), request)
    }

    async fn get_repository(&self, repository: &RepositoryRef) -> Result<RepositoryRef, IntakeError> {
        let name = repository.to_string();
        self.record(GatewayCall::Repository {
            repository: name.clone(),
        });
        if self.existing.contains(&name) {
            Ok(repository.clone())
        } else {
            Err(IntakeError::Api {
                message: "get repository failed with status 404 Not Found: Not Found".to_owned(),
            })
        }
    }

    async fn list_team_repositories(
        &self,
        team: &TeamRef,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        self.record(GatewayCall::TeamRepositories {
            team: team.to_string(),
            page: request.page(),
        });
        self.repository_page(&Listing::Team(team.to_string()), request)
    }
}

#[async_trait]
impl PullRequestLister for RecordingGateway {
    async fn list_pull_requests(
        &self,
        repository: &RepositoryRef,
        params: &ListPullRequestsParams,
    ) -> Result<Paginated<PullRequest>, IntakeError> {
        let name = repository.to_string();
        self.record(GatewayCall::PullRequests {
            repository: name.clone(),
            page: params.page.page(),
            state: params.state,
        });
        params.page.validate()?;
        if let Some(error) = self.pull_request_failures.get(&name) {
            return Err(error.clone());
        }

        let pages = self.pull_requests.get(&name).map_or(&[][..], Vec::as_slice);
        let (items, has_next) = select_page(pages, params.page);
        Ok(page_of(items, params.page, has_next))
    }
}
