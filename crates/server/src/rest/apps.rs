use alertdesk_common::wire::{AppValidation, Environment, StoredMetric};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::error::ApiError;
use crate::rest::AppState;

#[derive(Deserialize)]
pub struct MetricsQuery {
    pub environment: Environment,
}

pub async fn validate_app(State(state): State<AppState>, Path(app_id): Path<String>) -> Json<AppValidation> {
    let verdict = state.apps.validate(&app_id);
    tracing::debug!(%app_id, valid = verdict.valid, "app id checked");
    Json(verdict)
}

pub async fn list_metrics(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<Vec<StoredMetric>>, ApiError> {
    if !state.apps.contains(&app_id) {
        return Err(ApiError::not_found("Application ID or environment not found"));
    }
    Ok(Json(state.metrics.list(&app_id, query.environment)))
}
