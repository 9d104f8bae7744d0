//! HTTP-level tests for the Octocrab gateway.

use rstest::rstest;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{ListPullRequestsParams, OctocrabGateway, PullRequestLister, RepositoryLister};
use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, RepositoryOwner, RepositoryRef, TeamRef};
use crate::github::models::LifecycleState;
use crate::github::pagination::PageRequest;

fn gateway_for(server: &MockServer) -> OctocrabGateway {
    let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
    let base = Url::parse(&server.uri()).expect("server URI should parse");
    OctocrabGateway::for_token(&token, &base).expect("should create gateway")
}

fn repository() -> RepositoryRef {
    RepositoryRef::parse("acme/api").expect("repository should parse")
}

fn link_to_page(server: &MockServer, route: &str, page: u32) -> String {
    format!(
        "<{uri}{route}?page={page}&per_page=100>; rel=\"next\", <{uri}{route}?page=3&per_page=100>; rel=\"last\"",
        uri = server.uri()
    )
}

#[tokio::test]
async fn org_repositories_map_full_names_and_next_link() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);
    let route = "/orgs/acme/repos";

    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([
                    { "full_name": "acme/api" },
                    { "full_name": "acme/web" }
                ]))
                .insert_header("Link", link_to_page(&server, route, 3)),
        )
        .mount(&server)
        .await;

    let owner = RepositoryOwner::new("acme").expect("owner should be valid");
    let page = gateway
        .list_org_repositories(&owner, PageRequest::new(2, 100))
        .await
        .expect("request should succeed");

    let names: Vec<String> = page.items.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["acme/api", "acme/web"]);
    assert_eq!(page.page_info.current_page(), 2);
    assert_eq!(page.page_info.total_pages(), Some(3));
    assert!(page.page_info.has_next());
}

#[tokio::test]
async fn user_repositories_without_link_header_are_the_last_page() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "full_name": "octocat/hello" }])),
        )
        .mount(&server)
        .await;

    let owner = RepositoryOwner::new("octocat").expect("owner should be valid");
    let page = gateway
        .list_user_repositories(&owner, PageRequest::default())
        .await
        .expect("request should succeed");

    assert_eq!(page.items.len(), 1);
    assert!(page.page_info.is_last_page());
}

#[tokio::test]
async fn team_repositories_use_the_team_route() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/platform/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "full_name": "acme/infra" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let team = TeamRef::parse("acme/platform").expect("team should parse");
    let page = gateway
        .list_team_repositories(&team, PageRequest::default())
        .await
        .expect("request should succeed");

    assert_eq!(
        page.items,
        vec![RepositoryRef::parse("acme/infra").expect("repository should parse")]
    );
}

#[tokio::test]
async fn get_repository_returns_canonical_name() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/repos/acme/api"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "full_name": "acme/api" })),
        )
        .mount(&server)
        .await;

    let found = gateway
        .get_repository(&repository())
        .await
        .expect("repository should exist");
    assert_eq!(found, repository());
}

#[tokio::test]
async fn get_repository_maps_not_found_to_api_error() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/repos/acme/api"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/repos#get-a-repository"
        })))
        .mount(&server)
        .await;

    let error = gateway
        .get_repository(&repository())
        .await
        .expect_err("missing repository should fail");

    assert!(
        matches!(&error, IntakeError::Api { message } if message.contains("404")),
        "expected Api error mentioning 404, got {error:?}"
    );
}

#[tokio::test]
async fn pull_requests_request_closed_by_most_recent_update() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/repos/acme/api/pulls"))
        .and(query_param("state", "closed"))
        .and(query_param("sort", "updated"))
        .and(query_param("direction", "desc"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "number": 42,
            "title": "Ship it",
            "body": "Release notes",
            "state": "closed",
            "html_url": "https://github.com/acme/api/pull/42",
            "user": { "login": "alice" },
            "created_at": "2024-07-01T00:00:00Z",
            "updated_at": "2024-07-04T00:00:00Z",
            "merged_at": "2024-07-03T00:00:00Z",
            "labels": [{ "name": "release" }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway
        .list_pull_requests(&repository(), &ListPullRequestsParams::default())
        .await
        .expect("request should succeed");

    let pull_request = page.items.first().expect("should have one pull request");
    assert_eq!(pull_request.number, 42);
    assert_eq!(pull_request.repository, repository());
    assert_eq!(pull_request.state, LifecycleState::Closed);
    assert_eq!(pull_request.labels, vec!["release"]);
    assert!(pull_request.is_merged());
    assert!(page.page_info.is_last_page());
}

#[rstest]
#[case::zero_page(PageRequest::new(0, 100))]
#[case::zero_per_page(PageRequest::new(1, 0))]
#[case::per_page_over_maximum(PageRequest::new(1, 101))]
#[tokio::test]
async fn invalid_pagination_is_rejected_before_any_request(#[case] request: PageRequest) {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    let error = gateway
        .list_pull_requests(&repository(), &ListPullRequestsParams::closed(request))
        .await
        .expect_err("invalid pagination should fail");

    assert!(
        matches!(error, IntakeError::InvalidPagination { .. }),
        "expected InvalidPagination, got {error:?}"
    );
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "no request should reach the server");
}

#[tokio::test]
async fn unauthorised_responses_map_to_authentication_errors() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let owner = RepositoryOwner::new("acme").expect("owner should be valid");
    let error = gateway
        .list_org_repositories(&owner, PageRequest::default())
        .await
        .expect_err("request should fail");

    assert!(
        matches!(&error, IntakeError::Authentication { message } if message.contains("Bad credentials")),
        "expected Authentication, got {error:?}"
    );
}

#[tokio::test]
async fn rate_limit_responses_carry_the_reset_window() {
    const EXPECTED_RESET_AT: u64 = 1_700_000_000;

    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    Mock::given(method("GET"))
        .and(path("/repos/acme/api/pulls"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "API rate limit exceeded for user",
            "documentation_url": "https://docs.github.com/rest/rate-limit"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resources": {
                "core": { "limit": 5000, "used": 5000, "remaining": 0, "reset": EXPECTED_RESET_AT },
                "search": { "limit": 30, "used": 0, "remaining": 30, "reset": EXPECTED_RESET_AT }
            },
            "rate": { "limit": 5000, "used": 5000, "remaining": 0, "reset": EXPECTED_RESET_AT }
        })))
        .mount(&server)
        .await;

    let error = gateway
        .list_pull_requests(&repository(), &ListPullRequestsParams::default())
        .await
        .expect_err("request should fail");

    match error {
        IntakeError::RateLimitExceeded {
            rate_limit,
            message,
        } => {
            let info = rate_limit.expect("expected rate_limit info to be populated");
            assert_eq!(info.reset_at(), EXPECTED_RESET_AT, "unexpected reset timestamp");
            assert!(info.is_exhausted());
            assert!(
                message.contains("API rate limit exceeded for user"),
                "unexpected message: {message}"
            );
            assert!(
                message.contains("2023-11-14T22:13:20"),
                "expected message to include reset time, got `{message}`"
            );
        }
        other => panic!("expected RateLimitExceeded, got {other:?}"),
    }
}
