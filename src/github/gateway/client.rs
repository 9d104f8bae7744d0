//! Octocrab client construction and shared page fetching.

use http::Uri;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use url::Url;

use crate::github::error::IntakeError;
use crate::github::locator::PersonalAccessToken;
use crate::github::pagination::{PageInfo, PageRequest};

use super::error_mapping::{map_octocrab_error, map_octocrab_error_with_rate_limit};

/// Octocrab-backed gateway implementing both listing capabilities.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an authenticated gateway for the given token and API base.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Configuration` when the base URL cannot be used
    /// as a URI or `IntakeError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, IntakeError> {
        let client = build_octocrab_client(token, api_base)?;
        Ok(Self::new(client))
    }

    pub(super) const fn client(&self) -> &Octocrab {
        &self.client
    }

    /// Fetches one page of a list endpoint and reports whether another
    /// page follows.
    pub(super) async fn fetch_page<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        request: PageRequest,
        filters: &[(&str, &str)],
    ) -> Result<(Vec<T>, PageInfo), IntakeError> {
        request.validate()?;

        let page_text = request.page().to_string();
        let per_page_text = request.per_page().to_string();
        let mut query: Vec<(&str, &str)> = filters.to_vec();
        query.push(("page", page_text.as_str()));
        query.push(("per_page", per_page_text.as_str()));

        let page: Page<T> = match self.client.get(path, Some(&query)).await {
            Ok(page) => page,
            Err(error) => {
                return Err(map_octocrab_error_with_rate_limit(&self.client, operation, &error).await);
            }
        };

        let page_info = PageInfo::for_request(request)
            .with_total_pages(page.number_of_pages())
            .with_has_next(page.next.is_some());

        Ok((page.items, page_info))
    }
}

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `IntakeError::Configuration` when the base URL is not a valid URI
/// or `IntakeError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &Url,
) -> Result<Octocrab, IntakeError> {
    let base_uri: Uri =
        api_base
            .as_str()
            .parse::<Uri>()
            .map_err(|error| IntakeError::Configuration {
                message: format!("GitHub API URL '{api_base}' is invalid: {error}"),
            })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| IntakeError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
