//! Instance template HTTP handlers.
//!
//! Implements `GET /compute/instancetemplate/list/{project}`.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::AppError, models::compute::InstanceTemplateSummary, state::AppState};

/// List all instance templates in a project.
///
/// # Endpoint
///
/// `GET /compute/instancetemplate/list/{project}`
///
/// # Response
///
/// - **Success (200 OK)**: JSON array of template summaries (may be empty)
/// - **Error (500)**: Google Compute API failure
///
/// ```json
/// [
///   {
///     "name": "web-v1",
///     "machine_type": "e2-medium",
///     "network": "default",
///     "tags": ["http-server"]
///   }
/// ]
/// ```
pub async fn list_instance_templates(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Vec<InstanceTemplateSummary>>, AppError> {
    let templates = state.gcp.list_instance_templates(&project).await?;

    let summaries: Vec<InstanceTemplateSummary> =
        templates.into_iter().map(Into::into).collect();
    Ok(Json(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::{InstanceProperties, InstanceTemplate, NetworkInterface, Tags};
    use crate::handlers::stub::{StubGcp, state_with};
    use axum::{Router, body::to_bytes, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(stub: StubGcp) -> Router {
        let (state, _) = state_with(stub);
        Router::new()
            .route(
                "/compute/instancetemplate/list/{project}",
                get(list_instance_templates),
            )
            .with_state(state)
    }

    #[tokio::test]
    async fn lists_template_summaries() {
        let app = app(StubGcp {
            templates: vec![InstanceTemplate {
                name: "web-v1".to_string(),
                properties: Some(InstanceProperties {
                    machine_type: Some("zones/us-central1-a/machineTypes/e2-medium".to_string()),
                    network_interfaces: vec![NetworkInterface {
                        network: Some("projects/demo/global/networks/default".to_string()),
                    }],
                    tags: Some(Tags {
                        items: vec!["http-server".to_string()],
                    }),
                }),
            }],
            ..Default::default()
        });

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/compute/instancetemplate/list/demo")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["name"], "web-v1");
        assert_eq!(json[0]["machine_type"], "e2-medium");
        assert_eq!(json[0]["network"], "default");
        assert_eq!(json[0]["tags"][0], "http-server");
    }
}
