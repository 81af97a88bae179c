//! # crud-listing
//!
//! Team-scoped CRUD service whose listing page is sortable, filterable and
//! paginated, with in-place HTMX updates.
//!
//! ## Features
//!
//! - **Clamping pagination**: any `page` value lands on a real page, so stale
//!   bookmarks and filtered-away pages never error
//! - **Elided navigation**: `1 2 3 4 5 6 7 … 10` style page links
//! - **Filters and ordering**: table-driven `name`, `number` and `sort`
//!   parameters, carried through every page link
//! - **HTMX fragments**: requests targeting the list container get only the
//!   container, with `Vary: hx-request, hx-target` on every listing response
//! - **JSON API** over the same listing pipeline
//! - **Access levels**: five tiers from a names-only summary up to delete,
//!   switchable per team
//!
//! ## Example
//!
//! ```rust,no_run
//! use crud_listing::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone());
//!     state.repository().seed("acme", 25).await?;
//!
//!     Server::new(config).serve(router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod health;
pub mod htmx;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::access::{AccessLevel, AccessPolicy, Permission};
    pub use crate::config::{Config, ListingConfig};
    pub use crate::error::{Error, Result};
    pub use crate::filters::FilterSet;
    pub use crate::health::{health, readiness};
    pub use crate::htmx::PartialSignal;
    pub use crate::listing::{Listing, ListingController, ListingRequest, RenderMode};
    pub use crate::models::{Thing, ThingInput};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{Page, PageMarker, PageStrategy, Paginator, RequestedPage};
    pub use crate::repository::{MemoryRepository, RecordQuery, Repository, RepositoryError};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, Query, State},
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
}
