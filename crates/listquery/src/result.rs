//! Paginated query results.

use serde::{Deserialize, Serialize};

use crate::params::QueryParams;

/// One page of results plus the metadata a list endpoint would return.
///
/// Serializes to `{"items": [...], "total": n, "page": p, "limit": l}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    /// The records on this page.
    pub items: Vec<T>,
    /// Number of records that passed every filter, across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
}

impl<T> QueryResult<T> {
    /// Number of pages needed to show `total` records.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit.max(1))
    }

    /// Returns `true` if a later page has records.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns `true` if this is not the first page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Transforms every item, keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> QueryResult<U>
    where
        F: FnMut(T) -> U,
    {
        QueryResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

impl<T: Clone> QueryResult<&T> {
    /// Clones the referenced items into an owned result.
    pub fn cloned(self) -> QueryResult<T> {
        self.map(Clone::clone)
    }
}

/// Pagination window derived from `page` and `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
}

impl Page {
    /// Reads `page` and `limit`, falling back to the defaults.
    pub fn from_params(params: &QueryParams) -> Self {
        Page {
            page: params.page(),
            limit: params.limit(),
        }
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Cuts this page out of the full result list.
    pub fn slice<T>(&self, mut rows: Vec<T>) -> Vec<T> {
        let offset = self.offset();
        if offset >= rows.len() {
            return Vec::new();
        }
        rows.truncate(offset.saturating_add(self.limit));
        rows.split_off(offset)
    }
}
