use std::collections::BTreeMap;

use alertdesk_engine::submission::BackendErrorPayload;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// An error answer in one of the two shapes clients decode: flat
/// `{error, message}` or structured `{error: {index: {field: [..]}}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: BackendErrorPayload,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            payload: BackendErrorPayload::bad_request(message),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            payload: BackendErrorPayload::not_found(message),
        }
    }

    pub fn violations(violations: &BTreeMap<usize, BTreeMap<String, Vec<String>>>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            payload: BackendErrorPayload::structured(violations),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flat_error_body() {
        let resp = ApiError::not_found("gone").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "gone");
    }
}
