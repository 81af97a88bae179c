//! HTTP handlers for things
//!
//! Two surfaces over the same record store and listing pipeline:
//!
//! - [`pages`]: server-rendered HTML under `/teams/{team}/things/`, with
//!   HTMX fragment rendering for the listing
//! - [`api`]: JSON under `/teams/{team}/api/things`
//!
//! Every handler takes the team from the path and only ever sees that
//! team's records. A thing belonging to another team is reported as not
//! found.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/teams/{team}/things/", get(pages::list_things))
//!     .route("/teams/{team}/api/things", get(api::list).post(api::create))
//!     .with_state(state);
//! ```

pub mod api;
pub mod pages;
mod response;

pub use response::{ItemResponse, ListResponse, PaginationMeta};
