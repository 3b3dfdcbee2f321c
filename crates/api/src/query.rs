//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Hard cap applied to `limit` regardless of what the caller asks for.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Default page size when `limit` is absent.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to sane bounds: limit in `1..=MAX_PAGE_SIZE`, offset `>= 0`.
    pub fn clamp(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
