//! Turns a [`ScopeSelection`] into the repositories to query.
//!
//! Organization, user, and team listings are paged until the upstream
//! reports no further page. Team scopes are merged into one list in
//! first-seen order with duplicates dropped.

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::github::error::IntakeError;
use crate::github::gateway::RepositoryLister;
use crate::github::locator::{RepositoryOwner, RepositoryRef, TeamRef};
use crate::github::pagination::{MAX_PER_PAGE, PageRequest, Paginated};
use crate::scope::ScopeSelection;

enum Listing<'a> {
    Organization(&'a RepositoryOwner),
    User(&'a RepositoryOwner),
    Team(&'a TeamRef),
}

async fn list_page<L>(
    lister: &L,
    listing: &Listing<'_>,
    request: PageRequest,
) -> Result<Paginated<RepositoryRef>, IntakeError>
where
    L: RepositoryLister + ?Sized,
{
    match listing {
        Listing::Organization(owner) => lister.list_org_repositories(owner, request).await,
        Listing::User(owner) => lister.list_user_repositories(owner, request).await,
        Listing::Team(team) => lister.list_team_repositories(team, request).await,
    }
}

async fn collect_pages<L>(
    lister: &L,
    listing: &Listing<'_>,
    seen: &mut IndexSet<RepositoryRef>,
) -> Result<(), IntakeError>
where
    L: RepositoryLister + ?Sized,
{
    let mut request = PageRequest::first(MAX_PER_PAGE);
    loop {
        let page = list_page(lister, listing, request).await?;
        debug!(
            page = request.page(),
            repositories = page.items.len(),
            "listed repository page"
        );

        let exhausted = page.items.is_empty();
        seen.extend(page.items);
        if exhausted || !page.page_info.has_next() {
            return Ok(());
        }
        request = request.next();
    }
}

/// Resolves `selection` to a non-empty, duplicate-free repository list.
///
/// # Errors
///
/// Upstream errors are returned unchanged. Malformed repository or team
/// identifiers yield [`IntakeError::InvalidRepository`] or
/// [`IntakeError::InvalidTeam`], and an empty result yields
/// [`IntakeError::NoRepositoriesFound`] naming the scope.
pub async fn enumerate<L>(
    selection: &ScopeSelection,
    lister: &L,
) -> Result<Vec<RepositoryRef>, IntakeError>
where
    L: RepositoryLister + ?Sized,
{
    let mut seen = IndexSet::new();

    match selection {
        ScopeSelection::Organization(name) => {
            let owner = RepositoryOwner::new(name)?;
            collect_pages(lister, &Listing::Organization(&owner), &mut seen).await?;
        }
        ScopeSelection::User(name) => {
            let owner = RepositoryOwner::new(name)?;
            collect_pages(lister, &Listing::User(&owner), &mut seen).await?;
        }
        ScopeSelection::Teams(entries) => {
            let teams = entries
                .iter()
                .map(|entry| TeamRef::parse(entry))
                .collect::<Result<Vec<_>, _>>()?;
            for team in &teams {
                collect_pages(lister, &Listing::Team(team), &mut seen).await?;
            }
        }
        ScopeSelection::Repository(name) => {
            let repository = RepositoryRef::parse(name)?;
            seen.insert(lister.get_repository(&repository).await?);
        }
    }

    if seen.is_empty() {
        return Err(IntakeError::NoRepositoriesFound {
            scope: selection.to_string(),
        });
    }

    info!(scope = %selection, repositories = seen.len(), "enumerated repositories");
    Ok(seen.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, function};
    use rstest::rstest;

    use super::enumerate;
    use crate::github::error::IntakeError;
    use crate::github::gateway::{MockRepositoryLister, RecordingGateway};
    use crate::github::locator::{RepositoryOwner, RepositoryRef};
    use crate::github::pagination::{PageRequest, Paginated};
    use crate::scope::ScopeSelection;

    fn repos(names: &[&str]) -> Vec<RepositoryRef> {
        names
            .iter()
            .map(|name| RepositoryRef::parse(name).expect("valid repository"))
            .collect()
    }

    fn names(found: &[RepositoryRef]) -> Vec<String> {
        found.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn organization_pages_until_no_next_page() {
        let mut lister = MockRepositoryLister::new();
        lister
            .expect_list_org_repositories()
            .with(
                function(|owner: &RepositoryOwner| owner.as_str() == "acme"),
                always(),
            )
            .times(2)
            .returning(|_, request: PageRequest| {
                if request.page() == 1 {
                    Ok(Paginated::with_next(repos(&["acme/api", "acme/web"]), request))
                } else {
                    Ok(Paginated::last(repos(&["acme/cli"]), request))
                }
            });

        let found = enumerate(&ScopeSelection::Organization("acme".to_owned()), &lister)
            .await
            .expect("enumeration should succeed");

        assert_eq!(names(&found), ["acme/api", "acme/web", "acme/cli"]);
    }

    #[tokio::test]
    async fn user_scope_lists_user_repositories() {
        let gateway = RecordingGateway::default()
            .with_user_pages("octocat", &[&["octocat/hello", "octocat/spoon"]]);

        let found = enumerate(&ScopeSelection::User("octocat".to_owned()), &gateway)
            .await
            .expect("enumeration should succeed");

        assert_eq!(names(&found), ["octocat/hello", "octocat/spoon"]);
    }

    #[tokio::test]
    async fn teams_are_merged_in_first_seen_order_without_duplicates() {
        let gateway = RecordingGateway::default()
            .with_team_pages("acme/core", &[&["acme/api", "acme/db"], &["acme/web"]])
            .with_team_pages("acme/infra", &[&["acme/db", "acme/ops", "acme/api"]]);
        let selection = ScopeSelection::Teams(vec!["acme/core".to_owned(), "acme/infra".to_owned()]);

        let found = enumerate(&selection, &gateway)
            .await
            .expect("enumeration should succeed");

        assert_eq!(names(&found), ["acme/api", "acme/db", "acme/web", "acme/ops"]);
    }

    #[tokio::test]
    async fn repository_scope_confirms_existence() {
        let gateway = RecordingGateway::default().with_existing_repository("acme/api");

        let found = enumerate(&ScopeSelection::Repository("acme/api".to_owned()), &gateway)
            .await
            .expect("enumeration should succeed");

        assert_eq!(names(&found), ["acme/api"]);
    }

    #[tokio::test]
    async fn missing_repository_is_an_upstream_error() {
        let gateway = RecordingGateway::default();

        let result = enumerate(&ScopeSelection::Repository("acme/gone".to_owned()), &gateway).await;

        assert!(matches!(result, Err(IntakeError::Api { .. })), "got {result:?}");
    }

    #[rstest]
    #[case::no_slash("acme")]
    #[case::two_slashes("acme/api/extra")]
    #[case::empty_owner("/api")]
    #[tokio::test]
    async fn malformed_repository_is_rejected(#[case] input: &str) {
        let gateway = RecordingGateway::default();

        let result = enumerate(&ScopeSelection::Repository(input.to_owned()), &gateway).await;

        assert_eq!(
            result,
            Err(IntakeError::InvalidRepository {
                input: input.to_owned()
            })
        );
        assert!(gateway.calls().is_empty(), "no request should be sent");
    }

    #[tokio::test]
    async fn malformed_team_is_rejected() {
        let gateway = RecordingGateway::default();
        let selection = ScopeSelection::Teams(vec!["acme".to_owned()]);

        let result = enumerate(&selection, &gateway).await;

        assert_eq!(
            result,
            Err(IntakeError::InvalidTeam {
                input: "acme".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn empty_scope_reports_no_repositories() {
        let gateway = RecordingGateway::default();

        let result = enumerate(&ScopeSelection::Organization("empty".to_owned()), &gateway).await;

        assert_eq!(
            result,
            Err(IntakeError::NoRepositoriesFound {
                scope: "organization empty".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn listing_failure_is_returned_unchanged() {
        let failure = IntakeError::Network {
            message: "connection reset".to_owned(),
        };
        let gateway = RecordingGateway::default().with_org_failure("acme", failure.clone());

        let result = enumerate(&ScopeSelection::Organization("acme".to_owned()), &gateway).await;

        assert_eq!(result, Err(failure));
    }
}
