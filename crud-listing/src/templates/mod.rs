//! Askama templates for the server-rendered thing pages.
//!
//! Templates live in `crud-listing/templates/` and are compiled into the
//! binary. Handlers build a view value ([`ListingView`], [`FormView`]) and
//! wrap the page struct in [`HtmlTemplate`]:
//!
//! ```rust,ignore
//! let page = ThingListPage { ctx, view, access_choices };
//! HtmlTemplate::new(page).into_response()
//! ```
//!
//! The listing page includes `things/list_objects.html` for its list
//! container. [`ThingListFragment`] renders that same file on its own, so
//! the HTMX fragment and the full page can never drift apart.

mod context;
mod helpers;
mod pages;
mod response;
mod views;

pub use context::TemplateContext;
pub use helpers::{pluralize, truncate};
pub use pages::{ThingDetailPage, ThingFormPage, ThingListFragment, ThingListPage};
pub use response::HtmlTemplate;
pub use views::{
    access_choices, AccessChoice, FormView, ListingView, LockedField, PageLink, ThingRow,
    ROW_NAME_CHARS,
};

// Re-export askama Template derive for convenience
pub use askama::Template;
