//! Request tracking middleware
//!
//! Request ID generation and propagation, plus masking of sensitive headers
//! in trace output. Configured by `middleware.request_tracking`.

use axum::http::HeaderName;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::config::RequestTrackingConfig;

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: [HeaderName; 5] = [
    axum::http::header::AUTHORIZATION,
    axum::http::header::COOKIE,
    axum::http::header::SET_COOKIE,
    HeaderName::from_static("x-api-key"),
    HeaderName::from_static("x-auth-token"),
];

const DEFAULT_REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Header carrying the request ID
///
/// Falls back to `x-request-id` when the configured name is not a valid
/// header name.
pub fn request_id_header(config: &RequestTrackingConfig) -> HeaderName {
    HeaderName::try_from(config.request_id_header.as_str()).unwrap_or_else(|_| {
        tracing::warn!(
            header = %config.request_id_header,
            "Invalid request ID header name, using x-request-id"
        );
        DEFAULT_REQUEST_ID_HEADER
    })
}

/// Create a request ID layer that assigns a UUID to requests lacking one
pub fn request_id_layer(config: &RequestTrackingConfig) -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(config), MakeRequestUuid)
}

/// Create a layer copying the request ID onto the response
pub fn request_id_propagation_layer(config: &RequestTrackingConfig) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header(config))
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let config = RequestTrackingConfig::default();
        assert_eq!(request_id_header(&config), "x-request-id");
    }

    #[test]
    fn test_custom_header() {
        let config = RequestTrackingConfig {
            request_id_header: "x-correlation-id".to_string(),
            ..RequestTrackingConfig::default()
        };
        assert_eq!(request_id_header(&config), "x-correlation-id");
    }

    #[test]
    fn test_invalid_header_falls_back() {
        let config = RequestTrackingConfig {
            request_id_header: "not a header".to_string(),
            ..RequestTrackingConfig::default()
        };
        assert_eq!(request_id_header(&config), DEFAULT_REQUEST_ID_HEADER);
    }

    #[test]
    fn test_sensitive_headers_constant() {
        assert!(SENSITIVE_HEADERS.contains(&axum::http::header::AUTHORIZATION));
        assert!(SENSITIVE_HEADERS.iter().any(|h| h == "x-api-key"));
    }
}
