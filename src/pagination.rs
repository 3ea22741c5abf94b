//! Offset pagination shared by every listing endpoint.

use serde::{ser::SerializeMap, Serialize, Serializer};
use thiserror::Error;

pub(crate) const DEFAULT_PAGE: i64 = 1;
pub(crate) const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PaginationError {
    /// `limit=0` is deliberately not guarded and fails when computing the page count.
    #[error("division by zero computing total pages")]
    ZeroLimit,

    #[error("page window is out of range")]
    Overflow,
}

/// The `page` and `limit` a client asked for, defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageRequest {
    pub(crate) page: i64,
    pub(crate) limit: i64,
}

impl PageRequest {
    pub(crate) fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// The `LIMIT`/`OFFSET` pair for this page, `offset = (page - 1) * limit`.
    ///
    /// Negative values are passed through; the database rejects them.
    pub(crate) fn window(&self) -> Result<Window, PaginationError> {
        let offset = self
            .page
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.limit))
            .ok_or(PaginationError::Overflow)?;

        Ok(Window {
            limit: self.limit,
            offset,
        })
    }
}

/// Rows to skip and rows to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

/// One page of rows alongside the number of rows matching the same filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Listing<T> {
    pub(crate) total: i64,
    pub(crate) rows: Vec<T>,
}

/// `ceil(total / limit)`.
pub(crate) fn total_pages(total: i64, limit: i64) -> Result<i64, PaginationError> {
    if limit == 0 {
        return Err(PaginationError::ZeroLimit);
    }

    total
        .checked_add(limit)
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| n.checked_div(limit))
        .ok_or(PaginationError::Overflow)
}

/// The response envelope `{total, page, limit, total_pages, <key>: [...]}`.
#[derive(Debug)]
pub(crate) struct Paginated<T> {
    key: &'static str,
    total: i64,
    page: i64,
    limit: i64,
    total_pages: i64,
    rows: Vec<T>,
}

impl<T> Paginated<T> {
    pub(crate) fn new(
        key: &'static str,
        request: PageRequest,
        listing: Listing<T>,
    ) -> Result<Self, PaginationError> {
        Ok(Self {
            key,
            total: listing.total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(listing.total, request.limit)?,
            rows: listing.rows,
        })
    }
}

impl<T: Serialize> Serialize for Paginated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("total_pages", &self.total_pages)?;
        map.serialize_entry(self.key, &self.rows)?;
        map.end()
    }
}
