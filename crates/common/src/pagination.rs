//! Page/limit pagination for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Largest row offset the database accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Requested page, as sent by clients (`?page=2&limit=20`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Items per page.
    pub limit: Option<u64>,
}

/// A normalized page request: `page >= 1`, `1 <= limit <= max_limit`, and
/// the row offset fits a signed 64-bit `OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Items per page.
    pub limit: u64,
}

impl PageRequest {
    /// Build a page request, clamping out-of-range values.
    #[must_use]
    pub fn new(page: u64, limit: u64, max_limit: u64) -> Self {
        let limit = limit.clamp(1, max_limit.max(1));
        let last_page = MAX_OFFSET / limit + 1;

        Self {
            page: page.clamp(1, last_page),
            limit,
        }
    }

    /// Normalize a client query against the configured defaults.
    #[must_use]
    pub fn from_query(query: PageQuery, config: &PaginationConfig) -> Self {
        Self::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(config.default_limit),
            config.max_limit,
        )
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of results with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    /// 1-based index of the first document of this page.
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Paginated<T> {
    /// Wrap a fetched page together with the total row count.
    #[must_use]
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let total_pages = total_docs.div_ceil(request.limit).max(1);
        let has_prev_page = request.page > 1;
        let has_next_page = request.page < total_pages;

        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages,
            paging_counter: request.offset() + 1,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| request.page - 1),
            next_page: has_next_page.then(|| request.page + 1),
        }
    }

    /// Transform the documents, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}
