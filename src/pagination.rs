//! Page-number pagination for catalog listings
//!
//! Pages are 1-based with a fixed size. Slicing happens in SQL (LIMIT/OFFSET)
//! after filtering and de-duplication; this module only does the arithmetic
//! and reports the page metadata returned to clients.

use serde::Serialize;

/// Fixed number of spells per page
pub const PAGE_SIZE: i64 = 50;

/// A requested page, always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageRequest {
    /// Pages below 1 are clamped to 1.
    pub fn new(page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: PAGE_SIZE,
        }
    }

    /// Parse a raw `page` query value. Missing or non-numeric values mean page 1.
    pub fn parse(value: Option<&str>) -> Self {
        let page = value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Page metadata returned alongside the items
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_items = total_items.max(0);
        let per_page = request.per_page();
        let total_pages = (total_items + per_page - 1) / per_page;
        let page = request.page();

        Self {
            page,
            per_page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// True when the requested page lies past the last page. Such pages are
    /// answered with no items rather than an error.
    pub fn is_out_of_range(&self) -> bool {
        self.page > self.total_pages
    }
}

/// One page of results with its metadata.
///
/// `items` may hold fewer than `per_page` entries even when `has_next` is true:
/// spells dropped for lacking a translation are removed after slicing and the
/// page is not back-filled.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn empty(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            pagination,
        }
    }
}
