//! Tests for [`PageRequest`] validation and [`PageInfo`] position behaviour.

use rstest::rstest;

use crate::github::{IntakeError, PageInfo, PageRequest, Paginated};

#[rstest]
#[case::first(1, true)]
#[case::middle(2, true)]
#[case::last(5, false)]
fn position_behaviour(#[case] current_page: u32, #[case] has_next: bool) {
    let info = PageInfo::new(current_page, 50)
        .with_total_pages(Some(5))
        .with_has_next(has_next);

    assert_eq!(info.current_page(), current_page, "unexpected current page");
    assert_eq!(info.has_next(), has_next, "unexpected has_next");
    assert_eq!(info.is_last_page(), !has_next, "unexpected is_last_page");
    assert_eq!(info.total_pages(), Some(5), "unexpected total pages");
}

#[rstest]
fn default_request_is_first_full_page() {
    let request = PageRequest::default();
    assert_eq!(request.page(), 1);
    assert_eq!(request.per_page(), 100);
    assert_eq!(request.validate(), Ok(()));
}

#[rstest]
#[case::zero_page(PageRequest::new(0, 10), "page must be at least 1")]
#[case::zero_per_page(PageRequest::new(1, 0), "per_page must be at least 1")]
#[case::over_maximum(PageRequest::new(1, 101), "per_page must not exceed 100")]
fn invalid_requests_are_rejected(#[case] request: PageRequest, #[case] expected: &str) {
    assert_eq!(
        request.validate(),
        Err(IntakeError::InvalidPagination {
            message: expected.to_owned()
        })
    );
}

#[rstest]
fn paginated_constructors_set_navigation() {
    let request = PageRequest::first(2);
    let with_next = Paginated::with_next(vec![1, 2], request);
    let last = Paginated::last(vec![3], request.next());

    assert!(with_next.page_info.has_next());
    assert_eq!(last.page_info.current_page(), 2);
    assert!(last.page_info.is_last_page());
}
