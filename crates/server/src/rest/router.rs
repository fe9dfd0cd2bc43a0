use axum::routing::{get, post, put};
use axum::Router;

use super::{apps, health, metrics};
use crate::store::{AppRegistry, MetricStore};

#[derive(Clone)]
pub struct AppState {
    pub apps: AppRegistry,
    pub metrics: MetricStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/v1/apps/{app_id}/validate", get(apps::validate_app))
        .route("/v1/apps/{app_id}/metrics", get(apps::list_metrics))
        .route("/v1/rules", post(metrics::create_rule_set))
        .route(
            "/v1/metrics/{uuid}",
            put(metrics::update_metric).delete(metrics::delete_metric),
        )
        .with_state(state)
}
