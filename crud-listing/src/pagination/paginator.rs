//! Page-number paginator with a clamping strategy
//!
//! A listing that can be filtered interactively routinely receives page
//! numbers that were valid a moment ago: the user navigates to page 3, then
//! types into a filter box, and the filtered result only has one page. The
//! [`Paginator`] maps any requested page (well-formed or not) against a known
//! item count and always lands on a page inside `[1, num_pages]`.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use crud_listing::pagination::{Paginator, RequestedPage};
//!
//! let per_page = NonZeroU32::new(4).unwrap();
//! let paginator = Paginator::new(10, per_page);
//! assert_eq!(paginator.num_pages(), 3);
//!
//! // Past the end clamps to the last page
//! assert_eq!(paginator.resolve(&RequestedPage::from(5_i64)), 3);
//!
//! // Garbage falls back to page 1
//! assert_eq!(paginator.resolve(&RequestedPage::from("abc")), 1);
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::Pagination;

/// Keyword accepted in place of a page number to jump to the final page
pub const LAST_PAGE_KEYWORD: &str = "last";

/// A page number as it arrived from the outside world
///
/// Query strings carry text, JSON bodies may carry integers or floats. All of
/// them are accepted here and validated by [`Paginator::validate_number`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestedPage {
    /// An integer page number (may be out of range)
    Number(i64),
    /// A floating point page number; only integral values are usable
    Float(f64),
    /// Raw text, typically the `page` query parameter
    Text(String),
}

impl Default for RequestedPage {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl From<i64> for RequestedPage {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for RequestedPage {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<f64> for RequestedPage {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for RequestedPage {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RequestedPage {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Option<String>> for RequestedPage {
    fn from(s: Option<String>) -> Self {
        s.map(Self::Text).unwrap_or_default()
    }
}

impl fmt::Display for RequestedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Reasons a requested page could not be used as-is
///
/// [`Paginator::resolve`] recovers from each of them. [`Paginator::page`]
/// recovers from all but [`PageError::OutOfRange`], which only the strict
/// strategy produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    /// Input was not representable as an integer
    #[error("that page number is not an integer")]
    NotAnInteger,
    /// Input was an integer below 1
    #[error("that page number is less than 1")]
    BelowRange,
    /// Input was an integer above the last page (strict strategy only)
    #[error("that page contains no results")]
    OutOfRange,
}

impl PageError {
    /// The page a listing falls back to after this error
    #[must_use]
    pub const fn fallback_page(&self, num_pages: u32) -> u32 {
        match self {
            Self::NotAnInteger | Self::BelowRange => 1,
            Self::OutOfRange => num_pages,
        }
    }
}

/// How the paginator treats a page number past the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStrategy {
    /// Pull the number back to the last page
    #[default]
    Clamping,
    /// Report [`PageError::OutOfRange`]
    Strict,
}

impl fmt::Display for PageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamping => write!(f, "clamping"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Boundaries of one resolved page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-indexed page number, always within `[1, num_pages]`
    pub number: u32,
    /// Total number of pages, at least 1
    pub num_pages: u32,
    /// Offset of the first item on this page
    pub offset: u64,
    /// Number of items to take (the last page may absorb orphans)
    pub limit: u64,
    /// Total number of items being paginated
    pub count: u64,
}

impl PageWindow {
    /// Offset/limit pair for the record store
    #[must_use]
    pub const fn as_pagination(&self) -> Pagination {
        Pagination::new(self.offset, self.limit)
    }
}

/// Paginator over a sequence of known length
///
/// Pure function of its inputs; build one per request and throw it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: NonZeroU32,
    orphans: u32,
    strategy: PageStrategy,
}

impl Paginator {
    /// Create a clamping paginator for `count` items
    #[must_use]
    pub const fn new(count: u64, per_page: NonZeroU32) -> Self {
        Self {
            count,
            per_page,
            orphans: 0,
            strategy: PageStrategy::Clamping,
        }
    }

    /// Select the out-of-range behaviour
    #[must_use]
    pub const fn strategy(mut self, strategy: PageStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Let the last page absorb up to `orphans` trailing items
    #[must_use]
    pub const fn orphans(mut self, orphans: u32) -> Self {
        self.orphans = orphans;
        self
    }

    /// Total number of items
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Items per page
    #[must_use]
    pub const fn per_page(&self) -> NonZeroU32 {
        self.per_page
    }

    /// Total number of pages; an empty sequence still has one (empty) page
    #[must_use]
    pub fn num_pages(&self) -> u32 {
        let hits = self.count.saturating_sub(u64::from(self.orphans)).max(1);
        let pages = hits.div_ceil(u64::from(self.per_page.get()));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Check a requested page against the page bounds
    ///
    /// Applies the configured [`PageStrategy`] to numbers past the end.
    ///
    /// # Errors
    ///
    /// - [`PageError::NotAnInteger`] for non-numeric text or fractional floats
    /// - [`PageError::BelowRange`] for integers below 1
    /// - [`PageError::OutOfRange`] for integers past the end (strict only)
    pub fn validate_number(&self, requested: &RequestedPage) -> Result<u32, PageError> {
        let num_pages = self.num_pages();

        let number = match requested {
            RequestedPage::Number(n) => *n,
            RequestedPage::Float(f) => float_to_integer(*f)?,
            RequestedPage::Text(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case(LAST_PAGE_KEYWORD) {
                    return Ok(num_pages);
                }
                text.parse::<i64>().map_err(|_| PageError::NotAnInteger)?
            }
        };

        if number < 1 {
            return Err(PageError::BelowRange);
        }

        if number > i64::from(num_pages) {
            return match self.strategy {
                PageStrategy::Clamping => Ok(num_pages),
                PageStrategy::Strict => Err(PageError::OutOfRange),
            };
        }

        // number is within [1, num_pages] so the conversion cannot fail
        Ok(u32::try_from(number).unwrap_or(num_pages))
    }

    /// Resolve any requested page to a valid page number
    ///
    /// Never fails. Errors from [`validate_number`](Self::validate_number)
    /// are recovered with [`PageError::fallback_page`].
    #[must_use]
    pub fn resolve(&self, requested: &RequestedPage) -> u32 {
        self.validate_number(requested)
            .unwrap_or_else(|err| self.recover(requested, err))
    }

    /// Window for a requested page under the configured strategy
    ///
    /// Non-integer and below-range input always lands on page 1. A number
    /// past the end is clamped to the last page, or reported when the
    /// strategy is [`PageStrategy::Strict`].
    ///
    /// # Errors
    ///
    /// [`PageError::OutOfRange`], strict strategy only.
    pub fn page(&self, requested: &RequestedPage) -> Result<PageWindow, PageError> {
        match self.validate_number(requested) {
            Ok(number) => Ok(self.window(number)),
            Err(PageError::OutOfRange) => Err(PageError::OutOfRange),
            Err(err) => Ok(self.window(self.recover(requested, err))),
        }
    }

    fn recover(&self, requested: &RequestedPage, err: PageError) -> u32 {
        let fallback = err.fallback_page(self.num_pages());
        tracing::debug!(
            requested = %requested,
            error = %err,
            fallback,
            "Recovered from unusable page number"
        );
        fallback
    }

    /// Window for a requested page, recovering from any error
    #[must_use]
    pub fn resolve_page(&self, requested: &RequestedPage) -> PageWindow {
        self.window(self.resolve(requested))
    }

    /// Window for an already-validated page number
    fn window(&self, number: u32) -> PageWindow {
        let per_page = u64::from(self.per_page.get());
        let bottom = u64::from(number.saturating_sub(1)) * per_page;
        let mut top = bottom + per_page;
        if top + u64::from(self.orphans) >= self.count {
            top = self.count;
        }

        PageWindow {
            number,
            num_pages: self.num_pages(),
            offset: bottom.min(self.count),
            limit: top.saturating_sub(bottom),
            count: self.count,
        }
    }

    /// Compact page navigation around `number`
    ///
    /// See [`elided_page_range`](super::elided_page_range).
    #[must_use]
    pub fn elided_page_range(
        &self,
        number: u32,
        on_each_side: u32,
        on_ends: u32,
    ) -> Vec<super::PageMarker> {
        super::elided_page_range(number, self.num_pages(), on_each_side, on_ends)
    }
}

fn float_to_integer(value: f64) -> Result<i64, PageError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(PageError::NotAnInteger);
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(PageError::NotAnInteger);
    }
    Ok(value as i64)
}
