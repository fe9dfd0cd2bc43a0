use alertdesk_common::wire::{MetricDraft, RuleSetRequest, StoredMetric};
use alertdesk_engine::validation::structured_violations;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use crate::rest::AppState;

pub async fn create_rule_set(
    State(state): State<AppState>,
    Json(body): Json<RuleSetRequest>,
) -> Result<(StatusCode, Json<Vec<StoredMetric>>), ApiError> {
    if !state.apps.contains(&body.app_id) {
        tracing::warn!(app_id = %body.app_id, "rule set for unknown app id");
        return Err(ApiError::bad_request(format!("Unknown app id '{}'.", body.app_id)));
    }
    if body.metrics.is_empty() {
        return Err(ApiError::bad_request("At least one metric is required."));
    }
    let violations = structured_violations(&body.metrics);
    if !violations.is_empty() {
        tracing::warn!(app_id = %body.app_id, entries = violations.len(), "rule set rejected");
        return Err(ApiError::violations(&violations));
    }

    let created = state
        .metrics
        .insert_batch(&body.app_id, body.environment, body.metrics);
    tracing::info!(
        app_id = %body.app_id,
        environment = body.environment.as_str(),
        created = created.len(),
        "rule set stored"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_metric(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(body): Json<MetricDraft>,
) -> Result<Json<StoredMetric>, ApiError> {
    if state.metrics.get(&uuid).is_none() {
        return Err(not_found(&uuid));
    }
    let violations = structured_violations(std::slice::from_ref(&body));
    if !violations.is_empty() {
        return Err(ApiError::violations(&violations));
    }
    let updated = state.metrics.update(&uuid, body).ok_or_else(|| not_found(&uuid))?;
    tracing::info!(%uuid, "metric updated");
    Ok(Json(updated))
}

pub async fn delete_metric(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<StoredMetric>, ApiError> {
    let removed = state.metrics.delete(&uuid).ok_or_else(|| not_found(&uuid))?;
    tracing::info!(%uuid, "metric deleted");
    Ok(Json(removed))
}

fn not_found(uuid: &str) -> ApiError {
    ApiError::not_found(format!("Item with ID {uuid} not found."))
}
