use serde::Serialize;

use crate::utils::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT};

/// A validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Limit is clamped to [1, 10000]; negative offsets become 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Raw query-string values; anything that is not an integer falls back
    /// to the default.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |value: Option<&str>| value.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(limit), parse(offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
    pub returned: usize,
}

/// Response envelope shared by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total_count: i64, page: Page) -> Self {
        let returned = data.len();
        Self {
            data,
            pagination: PaginationMeta {
                total_count,
                limit: page.limit,
                offset: page.offset,
                returned,
            },
        }
    }
}
