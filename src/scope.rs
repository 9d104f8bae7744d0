//! Scope selection: exactly one of organization, teams, user, or repository.

use std::fmt;

use crate::config::EffectiveConfig;
use crate::github::error::IntakeError;

/// The single axis choosing which repositories a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelection {
    /// Every repository owned by an organization.
    Organization(String),
    /// The union of the repositories of several `org/team` entries.
    Teams(Vec<String>),
    /// Every repository owned by a user.
    User(String),
    /// One `owner/repo` repository.
    Repository(String),
}

impl ScopeSelection {
    /// Short name of the scope kind, as used in the report metadata.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Organization(_) => "organization",
            Self::Teams(_) => "teams",
            Self::User(_) => "user",
            Self::Repository(_) => "repository",
        }
    }

    /// The scope value; team lists are joined with `, `.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Organization(name) | Self::User(name) | Self::Repository(name) => name.clone(),
            Self::Teams(teams) => teams.join(", "),
        }
    }
}

impl fmt::Display for ScopeSelection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.kind(), self.value())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// Resolves the scope of `config`.
///
/// # Errors
///
/// - [`IntakeError::ConfigurationRequired`] when `config` is `None`.
/// - [`IntakeError::NoScopeSpecified`] when no selector is set.
/// - [`IntakeError::MultipleScopesSpecified`] naming every selector that is
///   set when there is more than one.
///
/// # Example
///
/// ```
/// use prtool::config::EffectiveConfig;
/// use prtool::scope::{ScopeSelection, validate};
///
/// let config = EffectiveConfig {
///     org: Some("acme".to_owned()),
///     ..EffectiveConfig::default()
/// };
/// assert_eq!(
///     validate(Some(&config)),
///     Ok(ScopeSelection::Organization("acme".to_owned()))
/// );
/// ```
pub fn validate(config: Option<&EffectiveConfig>) -> Result<ScopeSelection, IntakeError> {
    let config = config.ok_or(IntakeError::ConfigurationRequired)?;

    let teams: Vec<String> = config
        .teams
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|team| !team.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let mut selections = Vec::new();
    if let Some(org) = present(config.org.as_deref()) {
        selections.push(("org", ScopeSelection::Organization(org.to_owned())));
    }
    if !teams.is_empty() {
        selections.push(("team", ScopeSelection::Teams(teams)));
    }
    if let Some(user) = present(config.user.as_deref()) {
        selections.push(("user", ScopeSelection::User(user.to_owned())));
    }
    if let Some(repo) = present(config.repo.as_deref()) {
        selections.push(("repo", ScopeSelection::Repository(repo.to_owned())));
    }

    if selections.len() > 1 {
        return Err(IntakeError::MultipleScopesSpecified {
            scopes: selections
                .iter()
                .map(|(name, _)| (*name).to_owned())
                .collect(),
        });
    }

    selections
        .pop()
        .map(|(_, selection)| selection)
        .ok_or(IntakeError::NoScopeSpecified)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ScopeSelection, validate};
    use crate::config::EffectiveConfig;
    use crate::github::error::IntakeError;

    fn config(org: Option<&str>, teams: &[&str], user: Option<&str>, repo: Option<&str>) -> EffectiveConfig {
        EffectiveConfig {
            org: org.map(ToOwned::to_owned),
            teams: teams.iter().map(|team| (*team).to_owned()).collect(),
            user: user.map(ToOwned::to_owned),
            repo: repo.map(ToOwned::to_owned),
            ..EffectiveConfig::default()
        }
    }

    #[rstest]
    fn missing_configuration_is_rejected_first() {
        assert_eq!(validate(None), Err(IntakeError::ConfigurationRequired));
    }

    #[rstest]
    #[case::nothing(config(None, &[], None, None))]
    #[case::blank_values(config(Some("  "), &[" "], Some(""), None))]
    fn no_scope_is_rejected(#[case] input: EffectiveConfig) {
        assert_eq!(validate(Some(&input)), Err(IntakeError::NoScopeSpecified));
    }

    #[rstest]
    #[case::org(config(Some("acme"), &[], None, None), ScopeSelection::Organization("acme".to_owned()))]
    #[case::teams(
        config(None, &["acme/a", "acme/b"], None, None),
        ScopeSelection::Teams(vec!["acme/a".to_owned(), "acme/b".to_owned()])
    )]
    #[case::user(config(None, &[], Some("octocat"), None), ScopeSelection::User("octocat".to_owned()))]
    #[case::repo(
        config(None, &[], None, Some("acme/api")),
        ScopeSelection::Repository("acme/api".to_owned())
    )]
    fn single_scope_is_selected(#[case] input: EffectiveConfig, #[case] expected: ScopeSelection) {
        assert_eq!(validate(Some(&input)), Ok(expected));
    }

    #[rstest]
    #[case::org_and_user(config(Some("acme"), &[], Some("octocat"), None), &["org", "user"])]
    #[case::team_and_repo(config(None, &["acme/a"], None, Some("acme/api")), &["team", "repo"])]
    #[case::all(
        config(Some("acme"), &["acme/a"], Some("octocat"), Some("acme/api")),
        &["org", "team", "user", "repo"]
    )]
    fn multiple_scopes_are_named(#[case] input: EffectiveConfig, #[case] expected: &[&str]) {
        let result = validate(Some(&input));
        assert_eq!(
            result,
            Err(IntakeError::MultipleScopesSpecified {
                scopes: expected.iter().map(|name| (*name).to_owned()).collect(),
            })
        );
        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        for name in expected {
            assert!(message.contains(name), "message should name {name}: {message}");
        }
    }

    #[rstest]
    fn display_names_kind_and_value() {
        let teams = ScopeSelection::Teams(vec!["acme/a".to_owned(), "acme/b".to_owned()]);
        assert_eq!(teams.to_string(), "teams acme/a, acme/b");
        assert_eq!(
            ScopeSelection::Organization("acme".to_owned()).to_string(),
            "organization acme"
        );
    }
}
