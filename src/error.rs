//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::gcp::GcpError;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Parameter Errors**: Required query parameters missing or invalid
/// - **Provider Errors**: Any failure talking to the Google Cloud APIs
///
/// A provider failure only ever fails the request that triggered it; the
/// process keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required query parameter was not supplied.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),

    /// A query parameter was supplied but could not be parsed.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("invalid value for parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: String },

    /// The `strategy` query parameter is neither "rolling" nor "canary".
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("unknown update strategy: {0} (expected \"rolling\" or \"canary\")")]
    UnknownStrategy(String),

    /// A Google Cloud API call failed (transport error, non-2xx status,
    /// or an undecodable response body).
    ///
    /// This wraps any [`GcpError`] using the `#[from]` attribute.
    /// Returns HTTP 500 Internal Server Error with the upstream error
    /// text carried in the message.
    #[error("{0}")]
    Gcp(#[from] GcpError),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Unlike a service fronting its own database, the upstream error text is
/// deliberately surfaced in the message: this is a demo pass-through and
/// the Google API error body is the useful diagnostic.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code) = match self {
            AppError::MissingParam(_) => (StatusCode::BAD_REQUEST, "missing_parameter"),
            AppError::InvalidParam { .. } => (StatusCode::BAD_REQUEST, "invalid_parameter"),
            AppError::UnknownStrategy(_) => (StatusCode::BAD_REQUEST, "unknown_strategy"),
            AppError::Gcp(_) => (StatusCode::INTERNAL_SERVER_ERROR, "provider_error"),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
