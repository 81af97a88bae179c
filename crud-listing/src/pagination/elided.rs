//! Elided page ranges for pagination controls
//!
//! Long listings cannot show a link for every page. The elided range keeps
//! a few pages at each end and a few pages around the current one, and
//! collapses the rest into ellipsis markers:
//!
//! ```text
//! 1 … 8 9 [10] 11 12 … 50
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

/// Text rendered for an ellipsis marker
pub const ELLIPSIS: &str = "…";

/// One entry of an elided page range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    /// A page that gets its own link
    Page(u32),
    /// Two or more hidden pages
    Ellipsis,
}

impl PageMarker {
    /// Page number, if this marker is a page
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(*n),
            Self::Ellipsis => None,
        }
    }

    /// Whether this marker is an ellipsis
    #[must_use]
    pub const fn is_ellipsis(&self) -> bool {
        matches!(self, Self::Ellipsis)
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Build the elided page range around `current`
///
/// Keeps pages `1..=on_ends`, `num_pages-on_ends+1..=num_pages` and
/// `current-on_each_side..=current+on_each_side`. Runs of two or more
/// missing pages collapse into a single [`PageMarker::Ellipsis`]; a single
/// missing page is shown instead, since the marker would take the same
/// space as the link it hides.
///
/// So 10 pages around page 5 (`on_each_side = 2`, `on_ends = 1`) give
/// `1 2 3 4 5 6 7 … 10`, never `1 … 3 4 5 6 7 … 10`: the only page missing
/// on the left is 2, and it is kept.
///
/// `current` is clamped into `[1, num_pages]` and `num_pages` is treated as
/// at least 1. The result is a plain `Vec` so it can be rendered twice.
///
/// # Example
///
/// ```rust
/// use crud_listing::pagination::{elided_page_range, PageMarker::*};
///
/// let range = elided_page_range(10, 20, 2, 1);
/// assert_eq!(
///     range,
///     vec![Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(20)]
/// );
/// ```
#[must_use]
pub fn elided_page_range(
    current: u32,
    num_pages: u32,
    on_each_side: u32,
    on_ends: u32,
) -> Vec<PageMarker> {
    let num_pages = num_pages.max(1);
    let current = current.clamp(1, num_pages);

    let on_ends = on_ends.min(num_pages);
    let window_start = current.saturating_sub(on_each_side).max(1);
    let window_end = current.saturating_add(on_each_side).min(num_pages);

    let mut kept: Vec<u32> = (1..=on_ends)
        .chain(window_start..=window_end)
        .chain(num_pages - on_ends + 1..=num_pages)
        .collect();
    kept.sort_unstable();
    kept.dedup();

    let mut range = Vec::with_capacity(kept.len() + 2);
    let mut last_kept = 0_u32;

    for page in kept {
        match page - last_kept - 1 {
            0 => {}
            1 => range.push(PageMarker::Page(page - 1)),
            _ => range.push(PageMarker::Ellipsis),
        }
        range.push(PageMarker::Page(page));
        last_kept = page;
    }

    range
}
