//! prtool library crate: merged pull request reports for a GitHub scope.
//!
//! A run validates that exactly one scope (organization, teams, user, or
//! repository) is configured, resolves a relative `since` window to a cutoff,
//! enumerates the scope's repositories, collects the pull requests merged
//! after the cutoff, and renders them as markdown with an optional summary
//! from a language model.

pub mod collect;
pub mod config;
pub mod enumerate;
pub mod files;
pub mod github;
pub mod intake;
pub mod logging;
pub mod render;
pub mod scope;
pub mod summary;
pub mod time_window;

pub use collect::{Collection, RepositoryWarning};
pub use config::{EffectiveConfig, PartialConfig};
pub use github::{IntakeError, OctocrabGateway, PersonalAccessToken, PullRequest, RepositoryRef};
pub use intake::{FetchReport, RetrievalIntake};
pub use scope::ScopeSelection;
pub use time_window::Cutoff;
