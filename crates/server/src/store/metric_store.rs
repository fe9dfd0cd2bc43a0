use std::sync::Arc;

use alertdesk_common::batch::BatchStamper;
use alertdesk_common::clock::now_ms;
use alertdesk_common::wire::{Environment, MetricDraft, StoredMetric};
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct MetricRecord {
    app_id: String,
    environment: Environment,
    order: u64,
    stored: StoredMetric,
}

/// Metric rules keyed by uuid. Listing returns the newest batch first, each
/// batch in submission order.
#[derive(Clone, Default)]
pub struct MetricStore {
    metrics: Arc<DashMap<String, MetricRecord>>,
    stamper: Arc<BatchStamper>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_batch(&self, app_id: &str, environment: Environment, drafts: Vec<MetricDraft>) -> Vec<StoredMetric> {
        self.stamper
            .stamp(drafts)
            .into_iter()
            .map(|(order, stored)| {
                self.metrics.insert(
                    stored.uuid.clone(),
                    MetricRecord {
                        app_id: app_id.to_string(),
                        environment,
                        order,
                        stored: stored.clone(),
                    },
                );
                stored
            })
            .collect()
    }

    pub fn get(&self, uuid: &str) -> Option<StoredMetric> {
        self.metrics.get(uuid).map(|r| r.stored.clone())
    }

    pub fn list(&self, app_id: &str, environment: Environment) -> Vec<StoredMetric> {
        let mut records: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|r| r.value().app_id == app_id && r.value().environment == environment)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.order.cmp(&a.order));
        records.into_iter().map(|r| r.stored).collect()
    }

    pub fn update(&self, uuid: &str, metric: MetricDraft) -> Option<StoredMetric> {
        let mut record = self.metrics.get_mut(uuid)?;
        record.stored.metric = metric;
        record.stored.updated_at_ms = now_ms();
        Some(record.stored.clone())
    }

    pub fn delete(&self, uuid: &str) -> Option<StoredMetric> {
        self.metrics.remove(uuid).map(|(_, r)| r.stored)
    }

    pub fn count(&self) -> usize {
        self.metrics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertdesk_common::wire::{AlertChannel, Condition, FileSystemKind};

    fn draft(mount: &str) -> MetricDraft {
        MetricDraft {
            file_system_kind: FileSystemKind::Ext4,
            alert_channel: AlertChannel::Slack,
            condition: Condition::GreaterThan,
            threshold: 90,
            mount_path: mount.into(),
            email: None,
            slack_webhook: Some("https://hooks.slack.com/services/x".into()),
        }
    }

    #[test]
    fn list_is_scoped_and_ordered() {
        let store = MetricStore::new();
        store.insert_batch("billing", Environment::Prod, vec![draft("/old")]);
        store.insert_batch("billing", Environment::Prod, vec![draft("/a"), draft("/b")]);
        store.insert_batch("billing", Environment::Dev, vec![draft("/dev")]);

        let mounts: Vec<String> = store
            .list("billing", Environment::Prod)
            .into_iter()
            .map(|m| m.metric.mount_path)
            .collect();
        assert_eq!(mounts, ["/a", "/b", "/old"]);
        assert_eq!(store.count(), 4);
    }

    #[test]
    fn update_and_delete() {
        let store = MetricStore::new();
        let uuid = store.insert_batch("billing", Environment::Test, vec![draft("/a")]).remove(0).uuid;

        let updated = store.update(&uuid, draft("/b")).unwrap();
        assert_eq!(updated.metric.mount_path, "/b");
        assert_eq!(store.get(&uuid).unwrap().metric.mount_path, "/b");

        assert!(store.delete(&uuid).is_some());
        assert!(store.delete(&uuid).is_none());
        assert!(store.update(&uuid, draft("/c")).is_none());
    }
}
