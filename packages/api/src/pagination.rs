// ABOUTME: Pagination utilities for list endpoints
// ABOUTME: Query parameter parsing and the paginated response wrapper

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=&limit=` query parameters. Both are optional; out-of-range
/// values are clamped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    page: Option<i64>,
    limit: Option<i64>,
}

impl PaginationParams {
    /// Requested page, 1-indexed
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size for the SQL LIMIT clause
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of items plus its pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        let page = params.page();
        let page_size = params.limit();
        // Stable spelling of `i64::div_ceil` (unstable `int_roundings` feature)
        let total_pages = {
            let d = total_items / page_size;
            let r = total_items % page_size;
            if (r > 0 && page_size > 0) || (r < 0 && page_size < 0) {
                d + 1
            } else {
                d
            }
        };

        Self {
            data,
            pagination: PaginationMeta {
                page,
                page_size,
                total_items,
                total_pages,
                has_next_page: page < total_pages,
                has_previous_page: page > 1,
            },
        }
    }
}
