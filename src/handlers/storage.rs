//! Storage bucket HTTP handlers.
//!
//! Implements `GET /storage/list` - list bucket names in the configured
//! project.

use axum::{Json, extract::State};

use crate::{error::AppError, state::AppState};

/// List all bucket names in the configured project.
///
/// # Endpoint
///
/// `GET /storage/list`
///
/// # Response
///
/// - **Success (200 OK)**: JSON array of bucket names (may be empty)
/// - **Error (500)**: Google Storage API failure
///
/// ```json
/// ["my-assets", "my-backups"]
/// ```
///
/// The project is fixed in configuration (`GCP_PROJECT`), matching the
/// original demo; the listing call is bounded by a 30 second timeout
/// inside the client.
pub async fn list_buckets(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let buckets = state.gcp.list_buckets(&state.project).await?;
    Ok(Json(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::stub::{StubGcp, state_with};
    use axum::{Router, body::to_bytes, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(stub: StubGcp) -> Router {
        let (state, _) = state_with(stub);
        Router::new()
            .route("/storage/list", get(list_buckets))
            .with_state(state)
    }

    #[tokio::test]
    async fn returns_bare_array_of_names() {
        let app = app(StubGcp {
            buckets: vec!["alpha".to_string(), "beta".to_string()],
            ..Default::default()
        });

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/storage/list")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!(["alpha", "beta"]));
    }

    #[tokio::test]
    async fn provider_failure_is_a_500_with_error_envelope() {
        let app = app(StubGcp {
            fail: true,
            ..Default::default()
        });

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/storage/list")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "provider_error");
        assert!(
            json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("upstream unavailable")
        );
    }
}
