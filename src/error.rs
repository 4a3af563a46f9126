//! Error types for road-extract
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Transport, Store, etc.)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for road-extract operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for road-extract
///
/// Errors raised inside a background extraction job are captured by the
/// executor and recorded as a terminal `Failure` status; they never reach an
/// API caller synchronously. Only `Validation`, `Config`, and store-probe
/// errors surface directly through the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "storage.bucket")
        key: Option<String>,
    },

    /// Malformed caller input (e.g., a non-numeric feature id)
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reaching the external query service
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed JSON from the external query service
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Object storage operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Unexpected fault contained at a job boundary
    #[error("runtime fault: {0}")]
    Runtime(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),
}

/// Failures reaching the external query service
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connect, DNS, timeout)
    #[error("request to query service failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The query service answered with a non-success status
    #[error("query service returned {status}: {body}")]
    Status {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, carried verbatim for diagnosis
        body: String,
    },
}

/// Failures writing to or probing object storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP request to the storage endpoint failed
    #[error("request to object store failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage endpoint answered with a non-success status
    #[error("object store returned {status}: {body}")]
    Status {
        /// HTTP status code returned by the store
        status: u16,
        /// Response body, carried verbatim for diagnosis
        body: String,
    },

    /// Serializing the artifact body failed
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store write exceeded its deadline
    #[error("store write exceeded {seconds}s deadline")]
    DeadlineExceeded {
        /// The configured deadline in seconds
        seconds: u64,
    },

    /// An existence probe failed; presence of the artifact is unknown
    #[error("existence probe failed: {reason}")]
    ProbeFailed {
        /// The underlying probe failure
        reason: String,
    },
}

/// API error response format
///
/// Returned by API endpoints when an error occurs: a machine-readable code,
/// a human-readable message, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "validation_error",
///     "message": "invalid feature id: abc",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        let code = err.error_code().to_string();

        let details = match &err {
            Error::Transport(TransportError::Status { status, .. })
            | Error::Store(StoreError::Status { status, .. }) => {
                Some(serde_json::json!({ "upstream_status": status }))
            }
            Error::Config { key: Some(key), .. } => {
                Some(serde_json::json!({ "key": key }))
            }
            _ => None,
        };

        Self {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - client error (invalid input)
            Error::Config { .. } => 400,
            Error::Validation(_) => 400,

            // 502 Bad Gateway - the upstream query service misbehaved
            Error::Transport(_) => 502,
            Error::Decode(_) => 502,

            // 500 Internal Server Error - storage and everything else
            Error::Store(_) => 500,
            Error::Runtime(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServer(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Transport(_) => "transport_error",
            Error::Decode(_) => "decode_error",
            Error::Store(_) => "store_error",
            Error::Runtime(_) => "runtime_fault",
            Error::Io(_) => "io_error",
            Error::ApiServer(_) => "api_server_error",
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let error = Error::Validation("invalid feature id: abc".to_string());
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.error_code(), "validation_error");
    }

    #[test]
    fn upstream_status_maps_to_bad_gateway() {
        let error = Error::Transport(TransportError::Status {
            status: 503,
            body: "overloaded".to_string(),
        });
        assert_eq!(error.status_code(), 502);
        assert_eq!(error.error_code(), "transport_error");
    }

    #[test]
    fn store_failure_maps_to_internal_error() {
        let error = Error::Store(StoreError::Status {
            status: 403,
            body: "forbidden".to_string(),
        });
        assert_eq!(error.status_code(), 500);
        assert_eq!(error.error_code(), "store_error");
    }

    #[test]
    fn transport_status_message_carries_code_and_body() {
        let error = Error::Transport(TransportError::Status {
            status: 503,
            body: "try again later".to_string(),
        });
        let message = error.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("try again later"));
    }

    #[test]
    fn deadline_message_carries_the_configured_seconds() {
        let error = Error::Store(StoreError::DeadlineExceeded { seconds: 300 });
        assert!(error.to_string().contains("300"));
    }

    #[test]
    fn api_error_carries_upstream_status_detail() {
        let error = Error::Transport(TransportError::Status {
            status: 429,
            body: "rate limited".to_string(),
        });
        let api_error: ApiError = error.into();

        assert_eq!(api_error.error.code, "transport_error");
        assert!(api_error.error.message.contains("429"));
        let details = api_error.error.details.unwrap();
        assert_eq!(details["upstream_status"], 429);
    }

    #[test]
    fn api_error_for_config_names_the_key() {
        let error = Error::Config {
            message: "bucket must not be empty".to_string(),
            key: Some("storage.bucket".to_string()),
        };
        let api_error: ApiError = error.into();

        assert_eq!(api_error.error.code, "config_error");
        assert_eq!(
            api_error.error.details.unwrap()["key"],
            "storage.bucket"
        );
    }
}
