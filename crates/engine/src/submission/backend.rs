use std::collections::BTreeMap;

use alertdesk_common::wire::{MetricDraft, StoredMetric};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::record::RuleTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update { uuid: String },
    Delete { uuid: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub target: RuleTarget,
    pub operation: Operation,
    pub entries: Vec<MetricDraft>,
}

/// Raw error body returned by a backend; interpreted by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendErrorPayload(pub Value);

impl BackendErrorPayload {
    pub fn flat(kind: &str, message: impl Into<String>) -> Self {
        Self(json!({ "error": kind, "message": message.into() }))
    }

    pub fn structured(violations: &BTreeMap<usize, BTreeMap<String, Vec<String>>>) -> Self {
        let by_index: serde_json::Map<String, Value> = violations
            .iter()
            .map(|(index, fields)| (index.to_string(), json!(fields)))
            .collect();
        Self(json!({ "error": by_index }))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::flat("unavailable", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::flat("bad_request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::flat("not_found", message)
    }
}

impl std::fmt::Display for BackendErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendErrorPayload {}

/// The remote rules service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Create returns one stored record per entry; update the replaced
    /// record; delete the removed one.
    async fn submit(&self, request: SubmitRequest) -> Result<Vec<StoredMetric>, BackendErrorPayload>;

    async fn list(&self, target: &RuleTarget) -> Result<Vec<StoredMetric>, BackendErrorPayload>;
}
