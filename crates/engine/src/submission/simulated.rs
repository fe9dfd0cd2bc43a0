use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alertdesk_common::batch::BatchStamper;
use alertdesk_common::clock::now_ms;
use alertdesk_common::wire::{MetricDraft, StoredMetric};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use super::backend::{Backend, BackendErrorPayload, Operation, SubmitRequest};
use super::record::RuleTarget;
use crate::validation::structured_violations;

#[derive(Debug, Clone)]
struct Row {
    target: RuleTarget,
    order: u64,
    stored: StoredMetric,
}

/// In-memory backend with a fixed round-trip latency. Validates entries the
/// way the real service does and can be told to fail the next call.
pub struct SimulatedBackend {
    rows: DashMap<String, Row>,
    latency: Duration,
    stamper: BatchStamper,
    calls: AtomicUsize,
    fail_next: Mutex<Option<BackendErrorPayload>>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            rows: DashMap::new(),
            latency,
            stamper: BatchStamper::new(),
            calls: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
        }
    }

    /// Stores drafts directly, bypassing latency and validation.
    pub fn seed(&self, target: &RuleTarget, drafts: Vec<MetricDraft>) -> Vec<StoredMetric> {
        self.insert_all(target, drafts)
    }

    /// The next `submit` returns this payload instead of touching the store.
    pub async fn fail_next(&self, payload: BackendErrorPayload) {
        *self.fail_next.lock().await = Some(payload);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, uuid: &str) -> Option<StoredMetric> {
        self.rows.get(uuid).map(|r| r.stored.clone())
    }

    fn insert_all(&self, target: &RuleTarget, drafts: Vec<MetricDraft>) -> Vec<StoredMetric> {
        self.stamper
            .stamp(drafts)
            .into_iter()
            .map(|(order, stored)| {
                self.rows.insert(
                    stored.uuid.clone(),
                    Row {
                        target: target.clone(),
                        order,
                        stored: stored.clone(),
                    },
                );
                stored
            })
            .collect()
    }

    fn apply(&self, request: SubmitRequest) -> Result<Vec<StoredMetric>, BackendErrorPayload> {
        match request.operation {
            Operation::Create => {
                if request.entries.is_empty() {
                    return Err(BackendErrorPayload::bad_request("At least one metric is required."));
                }
                let violations = structured_violations(&request.entries);
                if !violations.is_empty() {
                    return Err(BackendErrorPayload::structured(&violations));
                }
                Ok(self.insert_all(&request.target, request.entries))
            }
            Operation::Update { uuid } => {
                let Some(metric) = request.entries.into_iter().next() else {
                    return Err(BackendErrorPayload::bad_request("An update needs exactly one metric."));
                };
                let violations = structured_violations(std::slice::from_ref(&metric));
                if !violations.is_empty() {
                    return Err(BackendErrorPayload::structured(&violations));
                }
                let mut row = self
                    .rows
                    .get_mut(&uuid)
                    .ok_or_else(|| BackendErrorPayload::not_found(format!("Metric {uuid} not found.")))?;
                row.stored.metric = metric;
                row.stored.updated_at_ms = now_ms();
                Ok(vec![row.stored.clone()])
            }
            Operation::Delete { uuid } => self
                .rows
                .remove(&uuid)
                .map(|(_, row)| vec![row.stored])
                .ok_or_else(|| BackendErrorPayload::not_found(format!("Metric {uuid} not found."))),
        }
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn submit(&self, request: SubmitRequest) -> Result<Vec<StoredMetric>, BackendErrorPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(payload) = self.fail_next.lock().await.take() {
            tracing::debug!(%payload, "injected backend failure");
            return Err(payload);
        }
        self.apply(request)
    }

    async fn list(&self, target: &RuleTarget) -> Result<Vec<StoredMetric>, BackendErrorPayload> {
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|r| &r.value().target == target)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.order.cmp(&a.order));
        Ok(rows.into_iter().map(|r| r.stored).collect())
    }
}
