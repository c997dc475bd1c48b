//! Page requests and the pagination envelope.
//!
//! Every list-style query takes a [`PageRequest`] and returns a
//! [`PagedResult`], whose [`Pagination`] is derived from the request and the
//! total number of matching rows.

use crate::input::{InputError, optional_positive};
use serde::{Deserialize, Serialize};

/// Page used when the caller does not supply one.
pub const DEFAULT_PAGE: i32 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i32 = 5;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i32,
    page_size: i32,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotPositive`] if `page` or `page_size` is below one.
    pub const fn new(page: i32, page_size: i32) -> Result<Self, InputError> {
        if page < 1 {
            return Err(InputError::NotPositive { field: "page" });
        }
        if page_size < 1 {
            return Err(InputError::NotPositive { field: "pageSize" });
        }
        Ok(Self { page, page_size })
    }

    /// The first page with the default page size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Build a request from optional raw values, applying the defaults.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if a supplied value is not a positive integer.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, InputError> {
        Self::new(
            optional_positive("page", page, DEFAULT_PAGE)?,
            optional_positive("pageSize", page_size, DEFAULT_PAGE_SIZE)?,
        )
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i32 {
        self.page
    }

    /// Maximum rows per page.
    #[must_use]
    pub const fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Row limit, widened for binding.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Pagination envelope accompanying every list result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Requested page
    pub current_page: i32,
    /// Requested page size
    pub page_size: i32,
    /// `ceil(total_results / page_size)`
    pub total_pages: i64,
    /// Rows matching the query across all pages
    pub total_results: i64,
    /// Whether a page precedes this one
    pub has_prev_page: bool,
    /// Whether a page follows this one
    pub has_next_page: bool,
}

impl Pagination {
    /// Derive the envelope for `request` given `total_results` matching rows.
    #[must_use]
    pub const fn new(request: PageRequest, total_results: i64) -> Self {
        let size = request.page_size as i64;
        let total_results = if total_results < 0 { 0 } else { total_results };
        let total_pages = (total_results + size - 1) / size;
        Self {
            current_page: request.page,
            page_size: request.page_size,
            total_pages,
            total_results,
            has_prev_page: request.page > 1,
            has_next_page: (request.page as i64) < total_pages,
        }
    }
}

/// One page of rows plus its pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Position of this page within the full result
    pub pagination: Pagination,
}

impl<T> PagedResult<T> {
    /// Wrap `data` fetched for `request` out of `total_results` rows.
    #[must_use]
    pub const fn new(data: Vec<T>, request: PageRequest, total_results: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(request, total_results),
        }
    }
}
