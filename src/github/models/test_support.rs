//! Test helpers for constructing `PullRequest` fixtures.
//!
//! # Examples
//!
//! ```
//! use prtool::github::models::test_support::merged_pull_request;
//!
//! let pr = merged_pull_request("acme/api", 7, "2024-07-05T10:00:00Z");
//! assert_eq!(pr.number, 7);
//! assert!(pr.is_merged());
//! ```

use chrono::{DateTime, Utc};

use super::{LifecycleState, PullRequest};
use crate::github::locator::RepositoryRef;

/// Builds a closed, merged pull request with a generated title and URL.
///
/// `updated_at` matches `merged_at`.
///
/// # Panics
///
/// Panics when `repository` is not `owner/name` or `merged_at` is not
/// RFC 3339; both are programming errors in a test.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture inputs are literals")]
pub fn merged_pull_request(repository: &str, number: u64, merged_at: &str) -> PullRequest {
    let merged = parse_time(merged_at);
    PullRequest {
        repository: RepositoryRef::parse(repository).expect("fixture repository should parse"),
        number,
        title: format!("Change {number}"),
        body: format!("Body of change {number}"),
        author: Some("octocat".to_owned()),
        created_at: merged,
        updated_at: Some(merged),
        merged_at: Some(merged),
        labels: Vec::new(),
        url: format!("https://github.com/{repository}/pull/{number}"),
        state: LifecycleState::Closed,
    }
}

/// Builds a pull request that was closed without merging.
///
/// # Panics
///
/// Panics under the same conditions as [`merged_pull_request`].
#[must_use]
pub fn closed_unmerged_pull_request(repository: &str, number: u64, updated_at: &str) -> PullRequest {
    PullRequest {
        merged_at: None,
        ..merged_pull_request(repository, number, updated_at)
    }
}

/// Returns a copy of `base` with a different `updated_at`.
///
/// # Panics
///
/// Panics when `updated_at` is not RFC 3339.
#[must_use]
pub fn with_updated_at(base: &PullRequest, updated_at: &str) -> PullRequest {
    PullRequest {
        updated_at: Some(parse_time(updated_at)),
        ..base.clone()
    }
}

/// Returns a copy of `base` carrying the given labels.
#[must_use]
pub fn with_labels(base: &PullRequest, labels: &[&str]) -> PullRequest {
    PullRequest {
        labels: labels.iter().map(|label| (*label).to_owned()).collect(),
        ..base.clone()
    }
}

#[expect(clippy::expect_used, reason = "fixture inputs are literals")]
fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("fixture timestamp should be RFC 3339")
        .with_timezone(&Utc)
}
