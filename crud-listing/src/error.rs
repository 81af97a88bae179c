//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::models::FieldErrors;
use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// The record store is offline or timed out (503)
    #[error("Record store unavailable: {0}")]
    RecordStoreUnavailable(RepositoryError),

    /// Any other record store failure
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The team's access level lacks a permission (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (422)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Submitted fields failed validation (422)
    #[error("Invalid fields: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    InvalidFields(FieldErrors),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,

    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
            fields: None,
        }
    }

    /// Attach per-field validation messages
    #[must_use]
    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(
            fields
                .into_iter()
                .map(|(field, messages)| (field.to_string(), messages))
                .collect(),
        );
        self
    }
}

impl Error {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::RecordStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ValidationError(_) | Error::InvalidFields(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Config(_)
            | Error::Repository(_)
            | Error::Template(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            Error::Config(e) => {
                ErrorResponse::with_code(status, "CONFIG_ERROR", e.to_string())
            }

            Error::RecordStoreUnavailable(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    "Record store unavailable: {}", e.message
                );
                ErrorResponse::with_code(
                    status,
                    "RECORD_STORE_UNAVAILABLE",
                    "The record store is temporarily unavailable",
                )
            }

            Error::Repository(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    entity_type = ?e.entity_type,
                    entity_id = ?e.entity_id,
                    "Repository error: {}", e.message
                );
                let code = format!("REPOSITORY_{}", e.kind.to_string().to_uppercase());
                ErrorResponse::with_code(status, code, "Record store operation failed")
            }

            Error::Template(e) => {
                tracing::error!("Template error: {}", e);
                ErrorResponse::with_code(status, "TEMPLATE_ERROR", "Failed to render page")
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code(status, "IO_ERROR", "I/O operation failed")
            }

            Error::Forbidden(msg) => ErrorResponse::with_code(status, "FORBIDDEN", msg),

            Error::NotFound(msg) => ErrorResponse::with_code(status, "NOT_FOUND", msg),

            Error::ValidationError(msg) => {
                ErrorResponse::with_code(status, "VALIDATION_ERROR", msg)
            }

            Error::InvalidFields(fields) => {
                ErrorResponse::with_code(status, "VALIDATION_ERROR", "Submitted data is invalid")
                    .with_fields(fields)
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err.kind {
            RepositoryErrorKind::Unavailable | RepositoryErrorKind::Timeout => {
                Error::RecordStoreUnavailable(err)
            }
            RepositoryErrorKind::NotFound => Error::NotFound(match (&err.entity_type, &err.entity_id) {
                (Some(kind), Some(id)) => format!("{kind} {id} not found"),
                _ => err.message,
            }),
            RepositoryErrorKind::ValidationFailed => Error::ValidationError(err.message),
            RepositoryErrorKind::Other => Error::Repository(err),
        }
    }
}
