//! Pagination for listing views
//!
//! Two pieces that every paginated listing needs:
//!
//! - [`Paginator`] - maps a requested page (any input) onto a valid page
//!   of a sequence with a known length, clamping instead of failing
//! - [`elided_page_range`] - the compact `1 … 4 5 [6] 7 8 … 20` navigation
//!   sequence around the current page
//!
//! [`Page`] bundles a resolved page with its items for templates and JSON.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use crud_listing::pagination::{Page, Paginator, RequestedPage};
//!
//! let things: Vec<u32> = (1..=10).collect();
//! let paginator = Paginator::new(things.len() as u64, NonZeroU32::new(4).unwrap());
//! let window = paginator.resolve_page(&RequestedPage::from("5"));
//!
//! let start = window.offset as usize;
//! let items = things[start..start + window.limit as usize].to_vec();
//! let page = Page::new(items, window, paginator.per_page());
//!
//! assert_eq!(page.number, 3);
//! assert_eq!(page.items, vec![9, 10]);
//! assert!(page.has_other_pages);
//! ```

mod elided;
mod page;
mod paginator;

pub use elided::{elided_page_range, PageMarker, ELLIPSIS};
pub use page::Page;
pub use paginator::{PageError, PageStrategy, PageWindow, Paginator, RequestedPage, LAST_PAGE_KEYWORD};
