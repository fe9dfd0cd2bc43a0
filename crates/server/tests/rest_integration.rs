use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use alertdesk_server::rest::{router, AppState};
use alertdesk_server::store::{AppRegistry, MetricStore};

fn app_state() -> AppState {
    AppState {
        apps: AppRegistry::new(["billing".to_string()]),
        metrics: MetricStore::new(),
    }
}

fn app() -> axum::Router {
    router(app_state())
}

fn metric(threshold: u8) -> Value {
    json!({
        "fileSystemKind": "ext4",
        "alertChannel": "email",
        "condition": ">",
        "threshold": threshold,
        "mountPath": "/var/log",
        "email": "ops@example.com"
    })
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn healthz_reports_counts() {
    let (status, body) = send(app(), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["apps"], 1);
}

#[tokio::test]
async fn ready_requires_registered_apps() {
    let (status, _) = send(app(), "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    let empty = router(AppState {
        apps: AppRegistry::default(),
        metrics: MetricStore::new(),
    });
    let (status, _) = send(empty, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn validate_app_known_and_unknown() {
    let (status, body) = send(app(), "GET", "/v1/apps/billing/validate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true, "message": ""}));

    let (_, body) = send(app(), "GET", "/v1/apps/nope/validate", None).await;
    assert_eq!(body, json!({"valid": false, "message": "App ID not found."}));
}

#[tokio::test]
async fn create_then_list() {
    let state = app_state();
    let request = json!({"appId": "billing", "environment": "prod", "metrics": [metric(80), metric(20)]});
    let (status, created) = send(router(state.clone()), "POST", "/v1/rules", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 2);
    assert!(created[0]["uuid"].is_string());
    assert!(created[0]["updatedAtMs"].is_i64());

    let (status, listed) = send(router(state.clone()), "GET", "/v1/apps/billing/metrics?environment=prod", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, created);

    let (_, other_env) = send(router(state), "GET", "/v1/apps/billing/metrics?environment=dev", None).await;
    assert_eq!(other_env, json!([]));
}

#[tokio::test]
async fn invalid_entries_get_structured_errors() {
    let request = json!({"appId": "billing", "environment": "dev", "metrics": [metric(50), metric(100)]});
    let (status, body) = send(app(), "POST", "/v1/rules", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": {"1": {"threshold": ["must be <= 99"]}}}));
}

#[tokio::test]
async fn unknown_app_is_flat_bad_request() {
    let request = json!({"appId": "ghost", "environment": "dev", "metrics": [metric(50)]});
    let (status, body) = send(app(), "POST", "/v1/rules", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn list_for_unknown_app_is_not_found() {
    let (status, body) = send(app(), "GET", "/v1/apps/ghost/metrics?environment=dev", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn update_and_delete_metric() {
    let state = app_state();
    let uuid = state
        .metrics
        .insert_batch("billing", alertdesk_common::wire::Environment::Dev, vec![serde_json::from_value(metric(10)).unwrap()])
        .remove(0)
        .uuid;
    let path = format!("/v1/metrics/{uuid}");

    let (status, updated) = send(router(state.clone()), "PUT", &path, Some(metric(60))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["threshold"], 60);
    assert_eq!(updated["uuid"], uuid.as_str());

    let (status, body) = send(router(state.clone()), "PUT", &path, Some(metric(0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["0"]["threshold"][0], "must be >= 1");

    let (status, _) = send(router(state.clone()), "DELETE", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(router(state), "DELETE", &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn update_unknown_metric_is_not_found() {
    let (status, _) = send(app(), "PUT", "/v1/metrics/missing", Some(metric(10))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
