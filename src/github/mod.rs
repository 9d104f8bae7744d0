//! GitHub access for repository enumeration and pull request listing.
//!
//! This module wraps Octocrab behind two capability traits, validates tokens
//! and identifiers, and maps upstream failures into [`IntakeError`] variants
//! so that callers can surface precise failures without exposing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use error::IntakeError;
pub use gateway::{ListPullRequestsParams, OctocrabGateway, PullRequestLister, RepositoryLister};
pub use locator::{PersonalAccessToken, RepositoryOwner, RepositoryRef, TeamRef};
pub use models::{LifecycleState, PullRequest};
pub use pagination::{PageInfo, PageRequest, Paginated};
pub use rate_limit::RateLimitInfo;

#[cfg(any(test, feature = "test-support"))]
pub use gateway::{GatewayCall, RecordingGateway};

#[cfg(test)]
pub use gateway::{MockPullRequestLister, MockRepositoryLister};

#[cfg(test)]
mod tests;
