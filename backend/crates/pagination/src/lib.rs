//! Page request validation and page window arithmetic.
//!
//! Catalogue endpoints accept a 1-based page number and return one fixed-size
//! slice of a filtered result set. This crate keeps the arithmetic in one
//! place so every adapter agrees on three rules:
//!
//! - a missing page means page 1;
//! - a page beyond the last page is clamped to the last page, and the slice is
//!   taken for the clamped page rather than the requested one;
//! - an empty result set yields an empty slice of 0 pages. An explicitly
//!   requested page clamps to page 0 there; the implicit default stays page 1.
//!
//! # Examples
//!
//! ```
//! use std::num::NonZeroU32;
//!
//! use pagination::{PageRequest, PageWindow};
//!
//! let size = NonZeroU32::new(50).expect("non-zero page size");
//! let request = PageRequest::new(5).expect("valid page");
//! let window = PageWindow::resolve(request, size, 120);
//!
//! assert_eq!(window.page(), 3);
//! assert_eq!(window.total_pages(), 3);
//! assert_eq!(window.offset(), 100);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors raised when a caller supplies an unusable page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are 1-based; zero and negatives are rejected.
    #[error("page must be at least 1, got {page}")]
    PageBelowOne {
        /// The rejected page number.
        page: i64,
    },
}

/// A validated, 1-based page number requested by a client.
///
/// Remembers whether the client named the page or the default was used, since
/// the two clamp differently against an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct PageRequest {
    page: NonZeroU32,
    explicit: bool,
}

impl PageRequest {
    /// The first page, used when the client does not ask for one.
    pub const FIRST: Self = Self {
        page: NonZeroU32::MIN,
        explicit: false,
    };

    /// Validate a raw page number.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageBelowOne`] when `page < 1`. Values above
    /// `u32::MAX` saturate, which the window later clamps to the last page.
    pub fn new(page: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::PageBelowOne { page });
        }
        let page = u32::try_from(page).unwrap_or(u32::MAX);
        NonZeroU32::new(page)
            .map(|page| Self {
                page,
                explicit: true,
            })
            .ok_or(PaginationError::PageBelowOne { page: 0 })
    }

    /// Resolve an optional raw page, defaulting to [`PageRequest::FIRST`].
    ///
    /// # Errors
    ///
    /// Propagates [`PaginationError`] from [`PageRequest::new`].
    pub fn from_optional(page: Option<i64>) -> Result<Self, PaginationError> {
        page.map_or(Ok(Self::FIRST), Self::new)
    }

    /// The requested page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.page.get()
    }

    /// Whether the client supplied this page rather than relying on the default.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        self.explicit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<i64> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageRequest> for u32 {
    fn from(value: PageRequest) -> Self {
        value.get()
    }
}

/// The slice of a result set that a page request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: NonZeroU32,
    total_items: u64,
    total_pages: u32,
}

impl PageWindow {
    /// Resolve `request` against a result set of `total_items` entries.
    #[must_use]
    pub fn resolve(request: PageRequest, page_size: NonZeroU32, total_items: u64) -> Self {
        let pages = total_items.div_ceil(u64::from(page_size.get()));
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        let page = match (total_pages, request.is_explicit()) {
            (0, false) => 1,
            _ => request.get().min(total_pages),
        };
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// The page actually served, after clamping.
    ///
    /// Always at least 1, except for an explicit request against an empty
    /// result set, which clamps to 0.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of pages needed to cover every matching item.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Number of items matching the query before paging.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Zero-based index of the first item on the served page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size.get())
    }

    /// Maximum number of items on a page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.page_size.get()
    }

    /// Whether the window covers no items at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// One served page of items together with the window that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    items: Vec<T>,
    window: PageWindow,
}

impl<T> Paginated<T> {
    /// Pair a loaded slice with its window.
    #[must_use]
    pub const fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    /// Items on the served page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The window metadata.
    #[must_use]
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Split into items and window.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageWindow) {
        (self.items, self.window)
    }

    /// Transform each item while keeping the window.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Page window arithmetic coverage.
    use super::*;
    use rstest::rstest;

    fn fifty() -> NonZeroU32 {
        NonZeroU32::new(50).expect("non-zero")
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn page_request_rejects_values_below_one(#[case] raw: i64) {
        let err = PageRequest::new(raw).expect_err("page below one");
        assert_eq!(err, PaginationError::PageBelowOne { page: raw });
    }

    #[rstest]
    fn missing_page_defaults_to_first() {
        let request = PageRequest::from_optional(None).expect("default page");
        assert_eq!(request, PageRequest::FIRST);
        assert_eq!(request.get(), 1);
        assert!(!request.is_explicit());
    }

    #[rstest]
    #[case(1, 1, 0, 50)]
    #[case(2, 2, 50, 50)]
    #[case(3, 3, 100, 50)]
    #[case(5, 3, 100, 50)]
    fn window_clamps_and_offsets(
        #[case] requested: i64,
        #[case] served: u32,
        #[case] offset: u64,
        #[case] limit: u32,
    ) {
        let request = PageRequest::new(requested).expect("valid page");
        let window = PageWindow::resolve(request, fifty(), 120);
        assert_eq!(window.page(), served);
        assert_eq!(window.total_pages(), 3);
        assert_eq!(window.offset(), offset);
        assert_eq!(window.limit(), limit);
    }

    #[rstest]
    #[case(4)]
    #[case(1)]
    fn explicit_page_on_empty_result_clamps_to_zero(#[case] requested: i64) {
        let request = PageRequest::new(requested).expect("valid page");
        let window = PageWindow::resolve(request, fifty(), 0);
        assert_eq!(window.page(), 0);
        assert_eq!(window.total_pages(), 0);
        assert_eq!(window.offset(), 0);
        assert!(window.is_empty());
    }

    #[rstest]
    fn default_page_on_empty_result_stays_first() {
        let window = PageWindow::resolve(PageRequest::FIRST, fifty(), 0);
        assert_eq!(window.page(), 1);
        assert_eq!(window.total_pages(), 0);
        assert_eq!(window.offset(), 0);
    }

    #[rstest]
    fn exact_multiple_does_not_add_a_page() {
        let window = PageWindow::resolve(PageRequest::FIRST, fifty(), 100);
        assert_eq!(window.total_pages(), 2);
    }

    #[rstest]
    fn page_request_deserialises_with_validation() {
        let ok: PageRequest = serde_json::from_str("2").expect("valid page");
        assert_eq!(ok.get(), 2);
        assert!(serde_json::from_str::<PageRequest>("0").is_err());
    }

    #[rstest]
    fn map_keeps_window() {
        let window = PageWindow::resolve(PageRequest::FIRST, fifty(), 2);
        let page = Paginated::new(vec![1, 2], window).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.window().total_items(), 2);
    }
}
