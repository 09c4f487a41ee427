//! Error types for the search API.
//!
//! This module defines all error types used throughout the REST layer,
//! with automatic conversion to JSON error responses.
//!
//! # Error Mapping
//!
//! | Source Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | ComposeError::InvalidInput | 400 | bad-request |
//! | ComposeError::InvalidQuery | 400 | bad-request |
//! | ComposeError::InvalidPagination | 400 | bad-request |
//! | ComposeError::PageOutOfRange | 400 | bad-request |
//! | QueryError | 400 | bad-request |
//! | BackendError::UnknownRequest | 404 | not-found |
//! | BackendError::InvalidPattern | 400 | bad-request |
//! | other BackendError | 500 | internal-error |
//! | missing principal | 401 | unauthorized |
//! | missing privilege | 403 | forbidden |
//!
//! Every error is returned as
//! `{"error": {"status": <u16>, "code": <code>, "message": <text>}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use firmscope_persistence::error::{BackendError, QueryError, StorageError};
use std::fmt;

use crate::composer::ComposeError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Bad request - invalid user input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// No authenticated principal (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Access denied (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Something referenced by the request does not exist (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "bad-request",
            RestError::Unauthorized { .. } => "unauthorized",
            RestError::Forbidden { .. } => "forbidden",
            RestError::NotFound { .. } => "not-found",
            RestError::InternalError { .. } => "internal-error",
        }
    }

    /// Returns the message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::Forbidden { message }
            | RestError::NotFound { message }
            | RestError::InternalError { message } => message,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = create_error_body(status, self.code(), self.message());
        (status, Json(body)).into_response()
    }
}

/// Creates the JSON error body.
///
/// # Arguments
///
/// * `status` - The HTTP status
/// * `code` - The machine-readable error code
/// * `message` - Human-readable message
fn create_error_body(status: StatusCode, code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "status": status.as_u16(),
            "code": code,
            "message": message,
        }
    })
}

// Implement conversions from composer and storage errors

impl From<ComposeError> for RestError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::MalformedDate { .. }
            | ComposeError::InvalidInput { .. }
            | ComposeError::InvalidQuery(_)
            | ComposeError::InvalidPagination { .. }
            | ComposeError::PageOutOfRange { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
            ComposeError::Backend(e) => match RestError::from(e) {
                RestError::InternalError { message } => RestError::InternalError {
                    message: format!("Could not query database: {}", message),
                },
                other => other,
            },
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Query(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::UnknownRequest { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            BackendError::InvalidPattern { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
            BackendError::Unavailable { .. }
            | BackendError::DataFile { .. }
            | BackendError::Internal { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                RestError::BadRequest {
                    message: String::new(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RestError::Unauthorized {
                    message: String::new(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                RestError::Forbidden {
                    message: String::new(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                RestError::InternalError {
                    message: String::new(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_error_body() {
        let body = create_error_body(StatusCode::BAD_REQUEST, "bad-request", "Search string not found");
        assert_eq!(body["error"]["status"], 400);
        assert_eq!(body["error"]["code"], "bad-request");
        assert_eq!(body["error"]["message"], "Search string not found");
    }

    #[test]
    fn test_invalid_input_keeps_message() {
        let err: RestError = ComposeError::InvalidInput {
            message: "Search string not found".to_string(),
        }
        .into();
        assert_eq!(err.message(), "Search string not found");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_failure_is_internal_error() {
        let err: RestError = ComposeError::Backend(
            BackendError::Unavailable {
                backend_name: "memory".to_string(),
                message: "down".to_string(),
            }
            .into(),
        )
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().starts_with("Could not query database"));
    }

    #[test]
    fn test_unknown_request_is_not_found() {
        let err: RestError = StorageError::from(BackendError::UnknownRequest {
            request_id: "abc".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_query_error_is_bad_request() {
        let err: RestError = QueryError::UnknownField {
            field: "colour".to_string(),
        }
        .into();
        assert_eq!(err.code(), "bad-request");
    }
}
