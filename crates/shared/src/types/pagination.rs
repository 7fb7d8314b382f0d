//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

/// Upper bound for a single page.
pub const MAX_LIMIT: u64 = 500;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Returns the limit clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The rows in the current page.
    pub rows: Vec<T>,
    /// Total number of rows matching the query across all pages.
    pub total: u64,
}

impl<T> PageResponse<T> {
    /// Slices an already filtered and sorted row set into one page.
    ///
    /// The input order is preserved, so pagination is stable as long as the
    /// caller's sort is.
    #[must_use]
    pub fn paginate(rows: Vec<T>, page: PageRequest) -> Self {
        let total = rows.len() as u64;
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.effective_limit()).unwrap_or(usize::MAX);

        let rows = rows.into_iter().skip(offset).take(limit).collect();

        Self { rows, total }
    }

    /// Maps every row of the page, keeping the total.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResponse<U> {
        PageResponse {
            rows: self.rows.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
