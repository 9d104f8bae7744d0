//! Pagination state for GitHub list endpoints.
//!
//! Listing calls take a [`PageRequest`] and return a [`Paginated`] page whose
//! [`PageInfo`] reports whether another page follows. Callers keep requesting
//! the next page until `has_next` is false.

use super::error::IntakeError;

/// Largest page size accepted by the GitHub REST API.
pub const MAX_PER_PAGE: u8 = 100;

/// Page position requested from a list endpoint.
///
/// # Example
///
/// ```
/// use prtool::github::pagination::PageRequest;
///
/// let first = PageRequest::first(50);
/// let second = first.next();
/// assert_eq!(second.page(), 2);
/// assert_eq!(second.per_page(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u8,
}

impl PageRequest {
    /// Creates a request for an explicit page.
    #[must_use]
    pub const fn new(page: u32, per_page: u8) -> Self {
        Self { page, per_page }
    }

    /// Creates a request for the first page.
    #[must_use]
    pub const fn first(per_page: u8) -> Self {
        Self::new(1, per_page)
    }

    /// Returns the request for the following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.per_page)
    }

    /// Requested page number (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Checks the request against the GitHub API limits.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when the page is zero or the
    /// page size falls outside `1..=100`.
    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.page == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        if self.per_page == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if self.per_page > MAX_PER_PAGE {
            return Err(IntakeError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(MAX_PER_PAGE)
    }
}

/// Current page state for paginated results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based).
    current_page: u32,
    /// Items per page.
    per_page: u8,
    /// Total number of pages if known.
    total_pages: Option<u32>,
    /// Whether more pages exist after the current one.
    has_next: bool,
}

impl PageInfo {
    /// Creates a new page info instance.
    ///
    /// The `total_pages` and navigation flag default to unknown / false.
    #[must_use]
    pub const fn new(current_page: u32, per_page: u8) -> Self {
        Self {
            current_page,
            per_page,
            total_pages: None,
            has_next: false,
        }
    }

    /// Creates page info describing the given request.
    #[must_use]
    pub const fn for_request(request: PageRequest) -> Self {
        Self::new(request.page, request.per_page)
    }

    /// Sets the total number of pages.
    #[must_use]
    pub const fn with_total_pages(mut self, total_pages: Option<u32>) -> Self {
        self.total_pages = total_pages;
        self
    }

    /// Sets whether there is a next page.
    #[must_use]
    pub const fn with_has_next(mut self, has_next: bool) -> Self {
        self.has_next = has_next;
        self
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Returns true if more pages exist after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::for_request(PageRequest::default())
    }
}

/// One page of items returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    /// Items on this page, in upstream order.
    pub items: Vec<T>,
    /// Pagination state.
    pub page_info: PageInfo,
}

impl<T> Paginated<T> {
    /// Wraps the items of a page that has no successor.
    #[must_use]
    pub fn last(items: Vec<T>, request: PageRequest) -> Self {
        Self {
            items,
            page_info: PageInfo::for_request(request),
        }
    }

    /// Wraps the items of a page that is followed by another page.
    #[must_use]
    pub fn with_next(items: Vec<T>, request: PageRequest) -> Self {
        Self {
            items,
            page_info: PageInfo::for_request(request).with_has_next(true),
        }
    }
}
