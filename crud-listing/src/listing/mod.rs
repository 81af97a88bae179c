//! Listing pipeline
//!
//! A listing request runs in a fixed order: scope the records to a team,
//! apply the bound filters and ordering, count, clamp the requested page into
//! range, fetch that slice and build the elided navigation. The response is
//! then rendered either as a full page or as the list fragment alone, and
//! always carries `Vary: hx-request, hx-target`.
//!
//! ```rust,ignore
//! let controller = ListingController::new(config.listing.clone());
//! let request = ListingRequest::from_params(params, PartialSignal::from_headers(&headers));
//! let listing = controller.list(repo.as_ref(), &team, request).await?;
//! ```

mod controller;
mod render;

pub use controller::{Listing, ListingController, ListingRequest};
pub use render::{vary_by_partial_signal, RenderMode};

pub use crate::config::ListingConfig;
