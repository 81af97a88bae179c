//! HTMX request header helpers.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum_htmx::{HX_HISTORY_RESTORE_REQUEST, HX_REQUEST, HX_TARGET};

fn header_is_true(headers: &HeaderMap, name: &HeaderName) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

/// Check if the current request was sent by HTMX (`HX-Request: true`).
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    header_is_true(headers, &HX_REQUEST)
}

/// The partial-update signal carried by an HTMX request
///
/// Collected once from the request headers. A plain browser request yields
/// the default value: no signal, no target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSignal {
    /// `HX-Request: true` was present
    pub is_htmx: bool,
    /// Id of the element HTMX will swap (`HX-Target`), if any
    pub target: Option<String>,
    /// HTMX is restoring history after a cache miss and needs a full page
    pub history_restore: bool,
}

impl PartialSignal {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            is_htmx: is_htmx_request(headers),
            target: headers
                .get(&HX_TARGET)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            history_restore: header_is_true(headers, &HX_HISTORY_RESTORE_REQUEST),
        }
    }

    /// A signal targeting `target`, as HTMX sends it
    #[must_use]
    pub fn targeting(target: impl Into<String>) -> Self {
        Self {
            is_htmx: true,
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Whether the request targets the element with id `container_id`
    #[must_use]
    pub fn targets(&self, container_id: &str) -> bool {
        self.target.as_deref() == Some(container_id)
    }
}

/// `Vary` value telling caches that responses differ by HTMX headers
///
/// A listing URL answers with either a full page or a fragment depending on
/// `HX-Request` and `HX-Target`, so both must be part of the cache key.
#[must_use]
pub fn vary_on_partial_signal() -> HeaderValue {
    HeaderValue::from_static("hx-request, hx-target")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_htmx_request() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx_request(&headers));

        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx_request(&headers));

        headers.insert("hx-request", HeaderValue::from_static("false"));
        assert!(!is_htmx_request(&headers));
    }

    #[test]
    fn test_signal_from_plain_request() {
        assert_eq!(PartialSignal::from_headers(&HeaderMap::new()), PartialSignal::default());
    }

    #[test]
    fn test_signal_from_htmx_request() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        headers.insert("hx-target", HeaderValue::from_static("object-list"));

        let signal = PartialSignal::from_headers(&headers);
        assert!(signal.is_htmx);
        assert!(signal.targets("object-list"));
        assert!(!signal.targets("sidebar"));
        assert!(!signal.history_restore);
        assert_eq!(signal, PartialSignal::targeting("object-list"));
    }

    #[test]
    fn test_history_restore_flag() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        headers.insert("hx-history-restore-request", HeaderValue::from_static("true"));
        assert!(PartialSignal::from_headers(&headers).history_restore);
    }

    #[test]
    fn test_vary_value_names_both_headers() {
        let vary = vary_on_partial_signal();
        let vary = vary.to_str().unwrap();
        assert!(vary.contains(HX_REQUEST.as_str()));
        assert!(vary.contains(HX_TARGET.as_str()));
    }
}
