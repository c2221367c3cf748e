//! Page cursors and the "fetch until a short page" loop.
//!
//! GitHub list endpoints take `page` (1-based) and `per_page` (at most 100)
//! query parameters. [`fetch_all_pages`] walks pages from a starting cursor
//! until a page comes back with fewer than `per_page` items.

use std::future::Future;

use tracing::debug;

use super::error::IntakeError;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Position within a paginated listing.
///
/// # Example
///
/// ```
/// use revue::github::PageCursor;
///
/// let cursor = PageCursor::new(1, 50).expect("valid cursor");
/// assert_eq!(cursor.next().page(), 2);
/// assert!(PageCursor::new(0, 50).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCursor {
    page: u32,
    per_page: u8,
}

impl PageCursor {
    /// Creates a cursor after validating both parameters.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidPagination` when `page` is zero or
    /// `per_page` is outside `1..=100`.
    pub fn new(page: u32, per_page: u8) -> Result<Self, IntakeError> {
        if page == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        if per_page == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if per_page > MAX_PER_PAGE {
            return Err(IntakeError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(Self { page, per_page })
    }

    /// Cursor for the first page with the given page size.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidPagination` when `per_page` is invalid.
    pub fn first(per_page: u8) -> Result<Self, IntakeError> {
        Self::new(1, per_page)
    }

    /// Page number (1-based).
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Items requested per page.
    #[must_use]
    pub const fn per_page(self) -> u8 {
        self.per_page
    }

    /// Cursor for the following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }

    /// Whether a page of `received` items is the last one.
    #[must_use]
    pub fn is_last_page(self, received: usize) -> bool {
        received < usize::from(self.per_page)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Fetches pages starting at `first` until one holds fewer than `per_page`
/// items, concatenating the results in page order.
///
/// A listing whose final page is exactly full costs one extra request that
/// returns an empty page.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`; items gathered from
/// earlier pages are discarded.
pub async fn fetch_all_pages<T, E, F, Fut>(first: PageCursor, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut items = Vec::new();
    let mut cursor = first;
    loop {
        let page_items = fetch_page(cursor).await?;
        let received = page_items.len();
        items.extend(page_items);

        if cursor.is_last_page(received) {
            debug!(
                pages = cursor.page(),
                total = items.len(),
                "pagination finished"
            );
            return Ok(items);
        }
        cursor = cursor.next();
    }
}
