//! Repository listing over the GitHub REST API.

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::locator::{RepositoryOwner, RepositoryRef, TeamRef};
use crate::github::models::ApiRepository;
use crate::github::pagination::{PageRequest, Paginated};

use super::RepositoryLister;
use super::client::OctocrabGateway;
use super::error_mapping::map_octocrab_error_with_rate_limit;

impl OctocrabGateway {
    async fn list_repositories(
        &self,
        operation: &str,
        path: &str,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        let (items, page_info) = self
            .fetch_page::<ApiRepository>(operation, path, request, &[])
            .await?;
        let repositories = items
            .into_iter()
            .map(RepositoryRef::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items: repositories,
            page_info,
        })
    }
}

#[async_trait]
impl RepositoryLister for OctocrabGateway {
    async fn list_org_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        let path = format!("/orgs/{owner}/repos");
        self.list_repositories("list organization repositories", &path, request)
            .await
    }

    async fn list_user_repositories(
        &self,
        owner: &RepositoryOwner,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        let path = format!("/users/{owner}/repos");
        self.list_repositories("list user repositories", &path, request)
            .await
    }

    async fn get_repository(&self, repository: &RepositoryRef) -> Result<RepositoryRef, IntakeError> {
        let client = self.client();
        let api = match client
            .get::<ApiRepository, _, _>(repository.repository_path(), None::<&()>)
            .await
        {
            Ok(api) => api,
            Err(error) => {
                return Err(
                    map_octocrab_error_with_rate_limit(client, "get repository", &error).await,
                );
            }
        };
        RepositoryRef::try_from(api)
    }

    async fn list_team_repositories(
        &self,
        team: &TeamRef,
        request: PageRequest,
    ) -> Result<Paginated<RepositoryRef>, IntakeError> {
        self.list_repositories("list team repositories", &team.repositories_path(), request)
            .await
    }
}
