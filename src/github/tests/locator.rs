//! Tests for repository, team, and token parsing.

use rstest::rstest;

use crate::github::locator::parse_api_base;
use crate::github::{IntakeError, PersonalAccessToken, RepositoryOwner, RepositoryRef, TeamRef};

#[rstest]
fn parses_owner_and_name() {
    let repo = RepositoryRef::parse("octo/repo").expect("should parse repository");
    assert_eq!(repo.owner(), "octo", "owner mismatch");
    assert_eq!(repo.name(), "repo", "name mismatch");
    assert_eq!(repo.pulls_path(), "/repos/octo/repo/pulls", "pulls path mismatch");
    assert_eq!(repo.repository_path(), "/repos/octo/repo", "repository path mismatch");
}

#[rstest]
fn surrounding_whitespace_is_ignored() {
    let repo = RepositoryRef::parse("  octo/repo ").expect("should parse trimmed repository");
    assert_eq!(repo.to_string(), "octo/repo");
}

#[rstest]
#[case::no_separator("octo")]
#[case::two_separators("octo/repo/extra")]
#[case::empty_owner("/repo")]
#[case::empty_name("octo/")]
#[case::blank("")]
fn rejects_malformed_repository(#[case] input: &str) {
    let result = RepositoryRef::parse(input);
    assert_eq!(
        result,
        Err(IntakeError::InvalidRepository {
            input: input.to_owned()
        })
    );
}

#[rstest]
fn parses_team_reference() {
    let team = TeamRef::parse("acme/platform").expect("should parse team");
    assert_eq!(team.organization(), "acme");
    assert_eq!(team.slug(), "platform");
    assert_eq!(team.repositories_path(), "/orgs/acme/teams/platform/repos");
}

#[rstest]
#[case::missing_slug("acme")]
#[case::nested("acme/platform/infra")]
#[case::empty_org("/platform")]
fn rejects_malformed_team(#[case] input: &str) {
    let result = TeamRef::parse(input);
    assert!(
        matches!(&result, Err(IntakeError::InvalidTeam { input: rejected }) if rejected == input),
        "expected InvalidTeam, got {result:?}"
    );
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn blank_tokens_are_missing(#[case] raw: &str) {
    assert_eq!(PersonalAccessToken::new(raw), Err(IntakeError::MissingToken));
}

#[rstest]
fn tokens_are_trimmed() {
    let token = PersonalAccessToken::new("  ghp_secret\n").expect("token should be valid");
    assert_eq!(token.value(), "ghp_secret");
}

#[rstest]
fn blank_owner_is_a_configuration_error() {
    let result = RepositoryOwner::new(" ");
    assert!(
        matches!(result, Err(IntakeError::Configuration { .. })),
        "expected Configuration, got {result:?}"
    );
}

#[rstest]
#[case::default(None, "https://api.github.com/")]
#[case::blank(Some("  "), "https://api.github.com/")]
#[case::enterprise(Some("https://ghe.example.com/api/v3"), "https://ghe.example.com/api/v3")]
fn api_base_defaults_to_public_github(#[case] input: Option<&str>, #[case] expected: &str) {
    let url = parse_api_base(input).expect("API base should parse");
    assert_eq!(url.as_str(), expected);
}

#[rstest]
#[case::not_a_url("not a url")]
#[case::wrong_scheme("ftp://ghe.example.com")]
fn api_base_rejects_unusable_urls(#[case] input: &str) {
    let result = parse_api_base(Some(input));
    assert!(
        matches!(result, Err(IntakeError::Configuration { .. })),
        "expected Configuration, got {result:?}"
    );
}
