//! Retrieval facade wiring scope, window, enumeration, and collection.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::collect::{CollectOptions, Collection, collect};
use crate::config::EffectiveConfig;
use crate::enumerate::enumerate;
use crate::github::error::IntakeError;
use crate::github::gateway::{PullRequestLister, RepositoryLister};
use crate::github::locator::RepositoryRef;
use crate::scope::{ScopeSelection, validate};
use crate::time_window::{Cutoff, resolve};

/// Everything one run retrieved, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// The resolved scope.
    pub scope: ScopeSelection,
    /// The `since` expression the cutoff was resolved from.
    pub since: String,
    /// The resolved cutoff.
    pub cutoff: Cutoff,
    /// Repositories in enumeration order.
    pub repositories: Vec<RepositoryRef>,
    /// Qualifying pull requests and per-repository warnings.
    pub collection: Collection,
}

/// Runs the retrieval pipeline against a pair of gateways.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use prtool::config::EffectiveConfig;
/// use prtool::github::gateway::RecordingGateway;
/// use prtool::github::models::test_support::merged_pull_request;
/// use prtool::intake::RetrievalIntake;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let now = Utc::now();
/// let merged = (now - chrono::TimeDelta::hours(1)).to_rfc3339();
/// let gateway = RecordingGateway::default()
///     .with_existing_repository("acme/api")
///     .with_pull_request_pages("acme/api", vec![vec![merged_pull_request("acme/api", 1, &merged)]]);
/// let config = EffectiveConfig {
///     repo: Some("acme/api".to_owned()),
///     ..EffectiveConfig::default()
/// };
///
/// let report = RetrievalIntake::new(&gateway, &gateway)
///     .fetch(&config, now)
///     .await
///     .expect("fetch succeeds");
/// assert_eq!(report.collection.pull_requests.len(), 1);
/// # }
/// ```
pub struct RetrievalIntake<'client, Repos, Pulls>
where
    Repos: RepositoryLister + ?Sized,
    Pulls: PullRequestLister + ?Sized,
{
    repositories: &'client Repos,
    pull_requests: &'client Pulls,
}

impl<'client, Repos, Pulls> RetrievalIntake<'client, Repos, Pulls>
where
    Repos: RepositoryLister + ?Sized,
    Pulls: PullRequestLister + ?Sized,
{
    /// Create a facade over the given gateways.
    #[must_use]
    pub const fn new(repositories: &'client Repos, pull_requests: &'client Pulls) -> Self {
        Self {
            repositories,
            pull_requests,
        }
    }

    /// Validates the scope, resolves the window relative to `now`,
    /// enumerates repositories, and collects their merged pull requests.
    ///
    /// # Errors
    ///
    /// Scope, time-window, and enumeration failures are returned. Failures
    /// fetching one repository's pull requests are reported as warnings in
    /// the [`FetchReport`] instead.
    pub async fn fetch(
        &self,
        config: &EffectiveConfig,
        now: DateTime<Utc>,
    ) -> Result<FetchReport, IntakeError> {
        let scope = validate(Some(config))?;
        let cutoff = resolve(&config.since, now)?;
        info!(scope = %scope, cutoff = %cutoff, "resolved retrieval window");

        let repositories = enumerate(&scope, self.repositories).await?;
        let collection = collect(
            &repositories,
            &cutoff,
            self.pull_requests,
            CollectOptions::with_concurrency(config.max_concurrency),
        )
        .await;

        Ok(FetchReport {
            scope,
            since: config.since.clone(),
            cutoff,
            repositories,
            collection,
        })
    }
}
