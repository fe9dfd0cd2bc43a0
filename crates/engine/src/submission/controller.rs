use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alertdesk_common::wire::{MetricDraft, StoredMetric};
use tokio::sync::Mutex;

use super::backend::{Backend, BackendErrorPayload, Operation, SubmitRequest};
use super::record::{RecordKey, RuleTarget, WorkingRecord};
use super::state::{BeforeImage, OpKind, OpState, OpStatus};
use crate::decode::{decode_with_fallback, PayloadShape};
use crate::error::EngineError;
use crate::notify::NotificationSurface;

pub const TIMED_OUT: &str = "The request timed out.";
pub const LOAD_FALLBACK: &str = "Error loading metrics. Please try again.";

#[derive(Debug, Default)]
struct Working {
    target: Option<RuleTarget>,
    records: Vec<WorkingRecord>,
    ops: HashMap<RecordKey, OpState>,
    next_provisional: u64,
}

impl Working {
    fn position(&self, key: &RecordKey) -> Option<usize> {
        self.records.iter().position(|r| &r.key == key)
    }

    fn pending_key(&self) -> Option<&RecordKey> {
        self.ops
            .iter()
            .find(|(_, state)| state.is_pending())
            .map(|(key, _)| key)
    }

    fn begin(&mut self, key: &RecordKey, kind: OpKind, before: BeforeImage) -> Result<(), EngineError> {
        let next = match self.ops.get(key) {
            Some(state) => state.begin(kind, before),
            None => OpState::Idle.begin(kind, before),
        };
        match next {
            Ok(next) => {
                self.ops.insert(key.clone(), next);
                Ok(())
            }
            Err(active) => {
                tracing::warn!(%key, active = active.as_str(), rejected = kind.as_str(), "operation already pending");
                Err(EngineError::OperationInFlight(key.clone()))
            }
        }
    }

    fn resolve(&mut self, key: &RecordKey, success: bool) -> Option<BeforeImage> {
        let state = self.ops.remove(key).unwrap_or(OpState::Idle);
        let (next, before) = state.resolve(success);
        self.ops.insert(key.clone(), next);
        before
    }

    /// Captures the row at `index` together with the keys around it.
    fn image(&self, index: usize) -> BeforeImage {
        BeforeImage::Present {
            index,
            prev: index.checked_sub(1).and_then(|i| self.records.get(i)).map(|r| r.key.clone()),
            next: self.records.get(index + 1).map(|r| r.key.clone()),
            record: self.records[index].clone(),
        }
    }

    /// Puts a row back the way it was before a failed update or delete. A
    /// removed row goes back beside a neighbour it had, not at a raw index.
    fn restore(&mut self, key: &RecordKey, before: BeforeImage) {
        match before {
            BeforeImage::Absent => {
                self.records.retain(|r| &r.key != key);
            }
            BeforeImage::Present {
                index,
                prev,
                next,
                record,
            } => match self.position(key) {
                Some(pos) => self.records[pos] = record,
                None => {
                    let at = prev
                        .and_then(|k| self.position(&k))
                        .map(|pos| pos + 1)
                        .or_else(|| next.and_then(|k| self.position(&k)))
                        .unwrap_or_else(|| index.min(self.records.len()));
                    self.records.insert(at, record);
                }
            },
        }
    }

    /// Forgets resolved operations on rows that are no longer listed.
    fn prune(&mut self) {
        let live: HashSet<&RecordKey> = self.records.iter().map(|r| &r.key).collect();
        self.ops.retain(|key, state| state.is_pending() || live.contains(key));
    }
}

/// Applies create, update and delete to a working list optimistically and
/// reconciles with the backend's answer.
///
/// Rows are addressed by [`RecordKey`], never by position. At most one
/// operation per key may be pending; a second one is rejected with
/// [`EngineError::OperationInFlight`]. The lock is never held across a
/// backend call, so operations on different rows overlap freely.
pub struct SubmissionController {
    backend: Arc<dyn Backend>,
    surface: Arc<dyn NotificationSurface>,
    timeout: Duration,
    working: Mutex<Working>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn Backend>, surface: Arc<dyn NotificationSurface>, timeout: Duration) -> Self {
        Self {
            backend,
            surface,
            timeout,
            working: Mutex::new(Working::default()),
        }
    }

    /// Replaces the working list with the given server records.
    pub async fn load(&self, target: RuleTarget, stored: Vec<StoredMetric>) -> Result<(), EngineError> {
        let mut w = self.working.lock().await;
        if let Some(key) = w.pending_key() {
            return Err(EngineError::OperationInFlight(key.clone()));
        }
        tracing::debug!(%target, records = stored.len(), "working list loaded");
        w.records = stored.into_iter().map(WorkingRecord::from).collect();
        w.ops.clear();
        w.target = Some(target);
        Ok(())
    }

    /// Fetches the target's records from the backend and loads them.
    pub async fn refresh(&self, target: RuleTarget) -> Result<usize, EngineError> {
        let stored = match self.call(self.backend.list(&target)).await {
            Ok(stored) => stored,
            Err(payload) => return Err(self.fail(&payload, LOAD_FALLBACK)),
        };
        let n = stored.len();
        self.load(target, stored).await?;
        Ok(n)
    }

    pub async fn records(&self) -> Vec<WorkingRecord> {
        self.working.lock().await.records.clone()
    }

    pub async fn target(&self) -> Option<RuleTarget> {
        self.working.lock().await.target.clone()
    }

    pub async fn key_at(&self, index: usize) -> Option<RecordKey> {
        self.working.lock().await.records.get(index).map(|r| r.key.clone())
    }

    pub async fn op_status(&self, key: &RecordKey) -> OpStatus {
        self.working
            .lock()
            .await
            .ops
            .get(key)
            .map(OpState::status)
            .unwrap_or(OpStatus::Idle)
    }

    /// True while any operation is pending.
    pub async fn is_busy(&self) -> bool {
        self.working.lock().await.pending_key().is_some()
    }

    /// Prepends the drafts as provisional rows, then submits them as one rule
    /// set. Switching to another target starts a fresh working list.
    pub async fn create(&self, target: &RuleTarget, drafts: Vec<MetricDraft>) -> Result<Vec<StoredMetric>, EngineError> {
        let keys = {
            let mut w = self.working.lock().await;
            if w.target.as_ref() != Some(target) {
                if let Some(key) = w.pending_key() {
                    return Err(EngineError::OperationInFlight(key.clone()));
                }
                w.records.clear();
                w.ops.clear();
                w.target = Some(target.clone());
            }

            let mut rows = Vec::with_capacity(drafts.len());
            for draft in &drafts {
                w.next_provisional += 1;
                rows.push(WorkingRecord::provisional(w.next_provisional, draft.clone()));
            }
            let keys: Vec<RecordKey> = rows.iter().map(|r| r.key.clone()).collect();
            for key in &keys {
                w.begin(key, OpKind::Create, BeforeImage::Absent)?;
            }
            w.records.splice(0..0, rows);
            keys
        };

        tracing::info!(%target, entries = drafts.len(), "submitting rule set");
        let request = SubmitRequest {
            target: target.clone(),
            operation: Operation::Create,
            entries: drafts,
        };
        let result = self.call(self.backend.submit(request)).await;

        let mut w = self.working.lock().await;
        match result {
            Ok(stored) => {
                let at = keys
                    .first()
                    .and_then(|k| w.position(k))
                    .unwrap_or(0);
                for key in &keys {
                    w.ops.remove(key);
                }
                w.records.retain(|r| !keys.contains(&r.key));
                let at = at.min(w.records.len());
                let committed: Vec<WorkingRecord> = stored.iter().cloned().map(WorkingRecord::from).collect();
                for record in &committed {
                    w.ops.insert(record.key.clone(), OpState::Committed { kind: OpKind::Create });
                }
                w.records.splice(at..at, committed);
                w.prune();
                tracing::info!(%target, created = stored.len(), "rule set committed");
                Ok(stored)
            }
            Err(payload) => {
                for key in &keys {
                    if let Some(before) = w.resolve(key, false) {
                        w.restore(key, before);
                    }
                }
                w.prune();
                drop(w);
                Err(self.fail(&payload, OpKind::Create.fallback_message()))
            }
        }
    }

    /// Replaces a server record in place.
    pub async fn update(&self, uuid: &str, draft: MetricDraft) -> Result<StoredMetric, EngineError> {
        let key = RecordKey::Server(uuid.to_string());
        let target = {
            let mut w = self.working.lock().await;
            let (index, target) = Self::locate(&w, &key, uuid)?;
            let before = w.image(index);
            w.begin(&key, OpKind::Update, before)?;
            w.records[index].metric = draft.clone();
            target
        };

        let request = SubmitRequest {
            target,
            operation: Operation::Update { uuid: uuid.to_string() },
            entries: vec![draft],
        };
        let result = self.call(self.backend.submit(request)).await;

        let mut w = self.working.lock().await;
        match result.and_then(|stored| {
            stored
                .into_iter()
                .next()
                .ok_or_else(|| BackendErrorPayload::unavailable("The rules service returned no record."))
        }) {
            Ok(stored) => {
                w.resolve(&key, true);
                if let Some(pos) = w.position(&key) {
                    w.records[pos] = WorkingRecord::from(stored.clone());
                }
                w.prune();
                tracing::info!(uuid, "metric updated");
                Ok(stored)
            }
            Err(payload) => {
                if let Some(before) = w.resolve(&key, false) {
                    w.restore(&key, before);
                }
                w.prune();
                drop(w);
                Err(self.fail(&payload, OpKind::Update.fallback_message()))
            }
        }
    }

    /// Removes a server record.
    pub async fn delete(&self, uuid: &str) -> Result<(), EngineError> {
        let key = RecordKey::Server(uuid.to_string());
        let target = {
            let mut w = self.working.lock().await;
            let (index, target) = Self::locate(&w, &key, uuid)?;
            let before = w.image(index);
            w.begin(&key, OpKind::Delete, before)?;
            w.records.remove(index);
            target
        };

        let request = SubmitRequest {
            target,
            operation: Operation::Delete { uuid: uuid.to_string() },
            entries: Vec::new(),
        };
        let result = self.call(self.backend.submit(request)).await;

        let mut w = self.working.lock().await;
        match result {
            Ok(_) => {
                w.resolve(&key, true);
                w.prune();
                tracing::info!(uuid, "metric deleted");
                Ok(())
            }
            Err(payload) => {
                if let Some(before) = w.resolve(&key, false) {
                    w.restore(&key, before);
                }
                w.prune();
                drop(w);
                Err(self.fail(&payload, OpKind::Delete.fallback_message()))
            }
        }
    }

    fn locate(w: &Working, key: &RecordKey, uuid: &str) -> Result<(usize, RuleTarget), EngineError> {
        let index = w
            .position(key)
            .ok_or_else(|| EngineError::RecordNotFound(uuid.to_string()))?;
        let target = w
            .target
            .clone()
            .ok_or_else(|| EngineError::RecordNotFound(uuid.to_string()))?;
        Ok((index, target))
    }

    async fn call<F>(&self, fut: F) -> Result<Vec<StoredMetric>, BackendErrorPayload>
    where
        F: Future<Output = Result<Vec<StoredMetric>, BackendErrorPayload>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "backend call timed out");
                Err(BackendErrorPayload::unavailable(TIMED_OUT))
            }
        }
    }

    fn fail(&self, payload: &BackendErrorPayload, fallback: &str) -> EngineError {
        let decoded = decode_with_fallback(&payload.0, fallback);
        self.surface.notify(&decoded.notification);
        match decoded.shape {
            PayloadShape::Structured => EngineError::BackendRejection(decoded.notification),
            PayloadShape::Flat | PayloadShape::Unrecognized => EngineError::BackendUnavailable(decoded.notification),
        }
    }
}
