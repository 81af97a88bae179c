//! Full page or fragment

use axum::http::header::VARY;
use axum::response::{IntoResponse, Response};

use crate::htmx::{vary_on_partial_signal, PartialSignal};

/// How a listing response is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// The whole document, layout included
    #[default]
    FullPage,
    /// Only the list container, for an in-place HTMX swap
    Fragment,
}

impl RenderMode {
    /// Pick the render mode for a request
    ///
    /// A fragment is sent only when HTMX asks to swap exactly the listing
    /// container. History restores always get the full page, since HTMX
    /// replaces the whole body with whatever comes back.
    #[must_use]
    pub fn decide(signal: &PartialSignal, container_id: &str) -> Self {
        if signal.is_htmx && !signal.history_restore && signal.targets(container_id) {
            Self::Fragment
        } else {
            Self::FullPage
        }
    }

    #[must_use]
    pub const fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment)
    }
}

/// Attach the cache-variance hint to a listing response
///
/// Both render modes carry it: a cache that stored the full page must not
/// serve it to an HTMX request for the same URL, and vice versa. The value
/// is appended so `Vary` entries set by other layers survive.
pub fn vary_by_partial_signal(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .append(VARY, vary_on_partial_signal());
    response
}
