//! Managed instance group HTTP handlers.
//!
//! This module implements the MIG-related API endpoints:
//! - GET /compute/instancegroup/{project}/{region}/{group} - fetch a summary
//! - GET /compute/instancegroup/get/{project}/{region}/{group} - alias
//! - GET /compute/instancegroup/update/{project}/{region}/{group} - roll
//!   out a new template via the rolling or canary strategy

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    error::AppError,
    gcp::{InstanceGroupManagerPatch, template_self_link},
    models::compute::{InstanceGroupSummary, UpdateQuery, UpdateStatus, UpdateStrategy},
    state::AppState,
};

/// Fetch a summary of a regional managed instance group.
///
/// # Endpoint
///
/// `GET /compute/instancegroup/{project}/{region}/{group}`
/// (also mounted under `/compute/instancegroup/get/...`)
///
/// # Response
///
/// - **Success (200 OK)**: group summary with template versions and
///   member instances
/// - **Error (500)**: Google Compute API failure
///
/// Two remote calls are made: one for the group resource, one for its
/// member instances.
pub async fn get_instance_group(
    State(state): State<AppState>,
    Path((project, region, group)): Path<(String, String, String)>,
) -> Result<Json<InstanceGroupSummary>, AppError> {
    let manager = state
        .gcp
        .get_instance_group(&project, &region, &group)
        .await?;
    let instances = state
        .gcp
        .list_managed_instances(&project, &region, &group)
        .await?;

    Ok(Json(InstanceGroupSummary::from_parts(manager, instances)))
}

/// Roll out a new instance template across a managed instance group.
///
/// # Endpoint
///
/// `GET /compute/instancegroup/update/{project}/{region}/{group}?strategy=rolling|canary&target_template=...&target_size=...`
///
/// # Query Parameters
///
/// - `strategy` (required): `rolling` or `canary`
/// - `target_template` (required): template name or self link
/// - `target_size`: required for `canary` (fixed size of the canary
///   version); for `rolling` it optionally resizes the group
///
/// # Response
///
/// - **Success (200 OK)**: `{"status":"ok"}` once the PATCH is accepted
/// - **Error (400)**: missing parameter or unknown strategy
/// - **Error (500)**: Google Compute API failure
///
/// A canary rollout must restate the group's current primary template in
/// the PATCH body, so it performs a preliminary GET of the group.
pub async fn update_instance_group(
    State(state): State<AppState>,
    Path((project, region, group)): Path<(String, String, String)>,
    Query(params): Query<UpdateQuery>,
) -> Result<Json<UpdateStatus>, AppError> {
    let strategy_raw = params.strategy.ok_or(AppError::MissingParam("strategy"))?;
    let strategy: UpdateStrategy = strategy_raw
        .parse()
        .map_err(|_| AppError::UnknownStrategy(strategy_raw.clone()))?;
    let target_template = params
        .target_template
        .ok_or(AppError::MissingParam("target_template"))?;
    let template_link = template_self_link(&project, &target_template);

    // Parsed here rather than by the extractor so a bad value surfaces
    // through the JSON error envelope.
    let target_size = params
        .target_size
        .as_deref()
        .map(|raw| {
            raw.parse::<i64>().map_err(|_| AppError::InvalidParam {
                name: "target_size",
                value: raw.to_string(),
            })
        })
        .transpose()?;

    let patch = match strategy {
        UpdateStrategy::Rolling => InstanceGroupManagerPatch::rolling(template_link, target_size),
        UpdateStrategy::Canary => {
            let size = target_size.ok_or(AppError::MissingParam("target_size"))?;
            let current = state
                .gcp
                .get_instance_group(&project, &region, &group)
                .await?;
            InstanceGroupManagerPatch::canary(&current, template_link, size)?
        }
    };

    state
        .gcp
        .patch_instance_group(&project, &region, &group, &patch)
        .await?;

    tracing::info!(
        "submitted {} update of {}/{}/{} to {}",
        strategy_raw,
        project,
        region,
        group,
        target_template
    );
    Ok(Json(UpdateStatus::ok()))
}
