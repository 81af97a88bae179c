//! HTMX support for the listing views.
//!
//! The listing page swaps its `#object-list` container in place when the
//! filter form changes or a page link is clicked. Those requests carry
//! `HX-Request` and `HX-Target`; [`PartialSignal`] collects them so the
//! listing can decide between a full page and a fragment.
//!
//! Header names come from `axum-htmx`.

mod helpers;

pub use helpers::{is_htmx_request, vary_on_partial_signal, PartialSignal};

pub use axum_htmx::{HX_HISTORY_RESTORE_REQUEST, HX_REQUEST, HX_TARGET};
