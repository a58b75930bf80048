//! # Pagination
//!
//! Page requests, page math and the paginated response shape.

use serde::{Deserialize, Serialize};

/// Page size used when a request gives none
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Upper bound on the page size
pub const MAX_PAGE_LIMIT: usize = 100;

/// Ordering by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` sorts newest first
    pub fn parse(value: &str) -> Self {
        if value == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Raw query-string parameters, parsed leniently
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort_direction: Option<String>,
}

/// A sanitized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    /// Items per page, within `1..=max_limit`
    pub limit: usize,
    pub sort_direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    /// Create a page request, clamping page and limit
    pub fn new(page: usize, limit: usize, sort_direction: SortDirection) -> Self {
        Self::clamped(page as i64, limit as i64, sort_direction, MAX_PAGE_LIMIT)
    }

    /// Build a request from query parameters.
    ///
    /// Unparseable numbers fall back to the defaults; page below 1 becomes 1,
    /// limit below 1 becomes the default and limit above `max_limit` becomes
    /// `max_limit`.
    pub fn from_query(query: &PageQuery, max_limit: usize) -> Self {
        let page = parse_number(query.page.as_deref()).unwrap_or(1);
        let limit = parse_number(query.limit.as_deref()).unwrap_or(DEFAULT_PAGE_LIMIT as i64);
        let sort_direction = query
            .sort_direction
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default();

        Self::clamped(page, limit, sort_direction, max_limit)
    }

    fn clamped(page: i64, limit: i64, sort_direction: SortDirection, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);
        let limit = if limit < 1 {
            DEFAULT_PAGE_LIMIT.min(max_limit)
        } else {
            usize::try_from(limit).unwrap_or(max_limit).min(max_limit)
        };

        Self {
            page: usize::try_from(page.max(1)).unwrap_or(1),
            limit,
            sort_direction,
        }
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn parse_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Cut one page out of an already sorted slice
    pub fn from_sorted(sorted: &[T], request: &PageRequest) -> Self {
        let total = sorted.len();
        let start = request.offset().min(total);
        let end = start.saturating_add(request.limit).min(total);

        Self {
            data: sorted[start..end].to_vec(),
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total_pages(total, request.limit),
        }
    }
}

/// Page count, never below 1
pub fn total_pages(total: usize, limit: usize) -> usize {
    total.div_ceil(limit.max(1)).max(1)
}
