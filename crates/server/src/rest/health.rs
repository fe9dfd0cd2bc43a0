use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::rest::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub apps: usize,
    pub metrics: usize,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        apps: state.apps.count(),
        metrics: state.metrics.count(),
    })
}

/// Ready once at least one app id is registered.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    if state.apps.count() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
