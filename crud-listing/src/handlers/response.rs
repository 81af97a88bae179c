//! Response types for the JSON API
//!
//! # Example
//!
//! ```rust
//! use crud_listing::handlers::{ItemResponse, ListResponse, PaginationMeta};
//! use crud_listing::pagination::{Page, Paginator};
//! use std::num::NonZeroU32;
//!
//! let per_page = NonZeroU32::new(20).unwrap();
//! let window = Paginator::new(1, per_page).resolve_page(&1_i64.into());
//! let page = Page::new(vec!["widget"], window, per_page);
//!
//! let response = ListResponse::from_page(page);
//! assert_eq!(response.pagination.total, 1);
//!
//! let item = ItemResponse::new("widget");
//! assert_eq!(item.data, "widget");
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::pagination::{Page, PageMarker};

/// Single item response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    /// The response data
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn map<U, F>(self, f: F) -> ItemResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ItemResponse { data: f(self.data) }
    }
}

impl<T: Serialize> IntoResponse for ItemResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Pagination metadata for list responses
///
/// Describes the page that was actually served, after clamping, so
/// `page` may differ from what the client asked for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items after filtering
    pub total: u64,
    /// Total number of pages, at least 1
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    /// Elided page navigation, with `"…"` for gaps
    #[serde(default, skip_deserializing)]
    pub pages: Vec<PageMarker>,
}

impl PaginationMeta {
    #[must_use]
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            page: page.number,
            per_page: page.per_page,
            total: page.count,
            total_pages: page.num_pages,
            has_next: page.has_next,
            has_prev: page.has_previous,
            pages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pages(mut self, pages: Vec<PageMarker>) -> Self {
        self.pages = pages;
        self
    }
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// The list of items for the current page
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> ListResponse<T> {
    pub fn from_page(page: Page<T>) -> Self {
        let pagination = PaginationMeta::from_page(&page);
        Self {
            data: page.items,
            pagination,
        }
    }

    #[must_use]
    pub fn with_pages(mut self, pages: Vec<PageMarker>) -> Self {
        self.pagination = self.pagination.with_pages(pages);
        self
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Paginator;
    use std::num::NonZeroU32;

    fn page_of(count: u64, number: i64) -> Page<u64> {
        let per_page = NonZeroU32::new(4).unwrap();
        let paginator = Paginator::new(count, per_page);
        let window = paginator.resolve_page(&number.into());
        let items = (window.offset..window.offset + window.limit).collect();
        Page::new(items, window, per_page)
    }

    #[test]
    fn test_meta_reflects_served_page() {
        let meta = PaginationMeta::from_page(&page_of(10, 9));
        assert_eq!(meta.page, 3);
        assert_eq!(meta.total, 10);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_list_response_serialization() {
        let response = ListResponse::from_page(page_of(10, 2))
            .with_pages(vec![PageMarker::Page(1), PageMarker::Page(2), PageMarker::Page(3)]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"], serde_json::json!([4, 5, 6, 7]));
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["pages"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_item_response_map() {
        let response = ItemResponse::new(2).map(|n| n * 10);
        assert_eq!(response.data, 20);
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }
}
