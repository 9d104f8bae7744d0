//! Pull request collection across repositories.
//!
//! Each repository is listed `state=closed`, most recently updated first,
//! and paged until the upstream has no next page or a whole page falls
//! outside the window. A failing repository is skipped with a
//! [`RepositoryWarning`]; the rest of the batch continues.
//!
//! Repositories are fetched concurrently through an order-preserving
//! buffered stream, so results always follow enumeration order.

use std::fmt;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::github::error::IntakeError;
use crate::github::gateway::{ListPullRequestsParams, PullRequestLister};
use crate::github::locator::RepositoryRef;
use crate::github::models::{LifecycleState, PullRequest};
use crate::github::pagination::{MAX_PER_PAGE, PageRequest};
use crate::time_window::Cutoff;

/// Tuning for a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Page size requested from the upstream.
    pub per_page: u8,
    /// Maximum number of repositories fetched at once; zero acts as one.
    pub concurrency: usize,
}

impl CollectOptions {
    /// Options with the given concurrency and full pages.
    #[must_use]
    pub const fn with_concurrency(concurrency: usize) -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            concurrency,
        }
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self::with_concurrency(DEFAULT_MAX_CONCURRENCY)
    }
}

/// A repository skipped because its pull requests could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryWarning {
    /// The skipped repository.
    pub repository: RepositoryRef,
    /// The failure that caused the skip.
    pub error: IntakeError,
}

impl RepositoryWarning {
    /// The warning as a [`IntakeError::RepositoryFetchFailed`].
    #[must_use]
    pub fn to_error(&self) -> IntakeError {
        IntakeError::RepositoryFetchFailed {
            repository: self.repository.to_string(),
            message: self.error.to_string(),
        }
    }
}

impl fmt::Display for RepositoryWarning {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_error())
    }
}

/// Qualifying pull requests plus the repositories that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// Merged pull requests inside the window, in enumeration order.
    pub pull_requests: Vec<PullRequest>,
    /// One entry per repository whose fetch failed.
    pub warnings: Vec<RepositoryWarning>,
}

/// True when `pull_request` was merged strictly after the cutoff.
#[must_use]
pub fn qualifies(pull_request: &PullRequest, cutoff: &Cutoff) -> bool {
    pull_request.state == LifecycleState::Closed
        && pull_request
            .merged_at
            .is_some_and(|merged_at| cutoff.admits(merged_at))
}

// Merge time never exceeds update time, so a page updated entirely at or
// before the cutoff means no later page can qualify either.
fn window_closed(page: &[PullRequest], cutoff: &Cutoff) -> bool {
    !page.is_empty()
        && page.iter().all(|pull_request| {
            pull_request
                .updated_at
                .is_some_and(|updated_at| !cutoff.admits(updated_at))
        })
}

async fn collect_repository<P>(
    repository: &RepositoryRef,
    cutoff: &Cutoff,
    lister: &P,
    per_page: u8,
) -> Result<Vec<PullRequest>, IntakeError>
where
    P: PullRequestLister + ?Sized,
{
    let mut qualifying = Vec::new();
    let mut request = PageRequest::first(per_page);

    loop {
        let params = ListPullRequestsParams::closed(request);
        let page = lister.list_pull_requests(repository, &params).await?;
        let stop = page.items.is_empty()
            || !page.page_info.has_next()
            || window_closed(&page.items, cutoff);

        debug!(
            repository = %repository,
            page = request.page(),
            pull_requests = page.items.len(),
            "listed pull request page"
        );

        qualifying.extend(
            page.items
                .into_iter()
                .filter(|pull_request| qualifies(pull_request, cutoff)),
        );

        if stop {
            return Ok(qualifying);
        }
        request = request.next();
    }
}

/// Collects merged pull requests inside the window from every repository.
///
/// Never fails as a whole: each repository error becomes a
/// [`RepositoryWarning`] and is logged at `warn`.
pub async fn collect<P>(
    repositories: &[RepositoryRef],
    cutoff: &Cutoff,
    lister: &P,
    options: CollectOptions,
) -> Collection
where
    P: PullRequestLister + ?Sized,
{
    let per_page = options.per_page;
    let outcomes: Vec<_> = stream::iter(repositories)
        .map(|repository| async move {
            let outcome = collect_repository(repository, cutoff, lister, per_page).await;
            (repository, outcome)
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut collection = Collection::default();
    for (repository, outcome) in outcomes {
        match outcome {
            Ok(pull_requests) => {
                info!(
                    repository = %repository,
                    pull_requests = pull_requests.len(),
                    "collected merged pull requests"
                );
                collection.pull_requests.extend(pull_requests);
            }
            Err(error) => {
                warn!(repository = %repository, error = %error, "skipping repository");
                collection.warnings.push(RepositoryWarning {
                    repository: repository.clone(),
                    error,
                });
            }
        }
    }
    collection
}
