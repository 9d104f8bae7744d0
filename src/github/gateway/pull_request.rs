//! Pull request listing over the GitHub REST API.

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::locator::RepositoryRef;
use crate::github::models::{ApiPullRequest, PullRequest};
use crate::github::pagination::Paginated;

use super::client::OctocrabGateway;
use super::{ListPullRequestsParams, PullRequestLister};

#[async_trait]
impl PullRequestLister for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        repository: &RepositoryRef,
        params: &ListPullRequestsParams,
    ) -> Result<Paginated<PullRequest>, IntakeError> {
        let filters = [
            ("state", params.state.as_str()),
            ("sort", "updated"),
            ("direction", "desc"),
        ];
        let (items, page_info) = self
            .fetch_page::<ApiPullRequest>("list pulls", &repository.pulls_path(), params.page, &filters)
            .await?;

        Ok(Paginated {
            items: items
                .into_iter()
                .map(|api| api.into_pull_request(repository))
                .collect(),
            page_info,
        })
    }
}
