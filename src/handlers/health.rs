//! Health check endpoint for service monitoring.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
///
/// The service keeps no local state and opens provider connections per
/// request, so there is nothing to probe beyond process liveness.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2026-08-30T19:00:00Z"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
