//! A resolved page together with its items

use std::num::NonZeroU32;

use serde::Serialize;

use super::PageWindow;

/// One page of results
///
/// Built from a [`PageWindow`] once the items for that window have been
/// fetched. All navigation flags are derived from the window so templates
/// and JSON clients never have to do page arithmetic themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, at most `per_page` (plus orphans)
    pub items: Vec<T>,
    /// 1-indexed page number
    pub number: u32,
    /// Total number of pages, at least 1
    pub num_pages: u32,
    /// Total number of items across all pages
    pub count: u64,
    /// Items per page
    pub per_page: u32,
    /// Whether there is any page besides this one
    pub has_other_pages: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u32>,
    pub previous_page_number: Option<u32>,
    /// 1-based position of the first item on this page, 0 when empty
    pub start_index: u64,
    /// 1-based position of the last item on this page, 0 when empty
    pub end_index: u64,
}

impl<T> Page<T> {
    /// Assemble a page from its window and items
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow, per_page: NonZeroU32) -> Self {
        let has_next = window.number < window.num_pages;
        let has_previous = window.number > 1;

        let (start_index, end_index) = if window.count == 0 {
            (0, 0)
        } else {
            (window.offset + 1, window.offset + window.limit)
        };

        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            per_page: per_page.get(),
            has_other_pages: has_next || has_previous,
            has_next,
            has_previous,
            next_page_number: has_next.then(|| window.number + 1),
            previous_page_number: has_previous.then(|| window.number - 1),
            start_index,
            end_index,
        }
    }

    /// Transform the items, keeping the page metadata
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
            has_other_pages: self.has_other_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}
