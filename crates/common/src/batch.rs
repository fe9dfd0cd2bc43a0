use std::sync::atomic::{AtomicU64, Ordering};

use crate::clock::now_ms;
use crate::record_id;
use crate::wire::{MetricDraft, StoredMetric};

/// Assigns identity and listing order to submitted batches. Higher order sorts
/// first: a later batch outranks every earlier one, and within a batch the
/// first draft ranks highest so submission order survives a descending sort.
#[derive(Debug, Default)]
pub struct BatchStamper {
    next: AtomicU64,
}

impl BatchStamper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&self, drafts: Vec<MetricDraft>) -> Vec<(u64, StoredMetric)> {
        let n = drafts.len() as u64;
        let base = self.next.fetch_add(n, Ordering::SeqCst);
        let now = now_ms();
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, metric)| {
                let stored = StoredMetric {
                    uuid: record_id::generate(),
                    updated_at_ms: now,
                    metric,
                };
                (base + (n - i as u64), stored)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{AlertChannel, Condition, FileSystemKind};

    fn draft(mount: &str) -> MetricDraft {
        MetricDraft {
            file_system_kind: FileSystemKind::Xfs,
            alert_channel: AlertChannel::Email,
            condition: Condition::LessThan,
            threshold: 10,
            mount_path: mount.into(),
            email: Some("ops@example.com".into()),
            slack_webhook: None,
        }
    }

    fn sorted(mut rows: Vec<(u64, StoredMetric)>) -> Vec<String> {
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter().map(|(_, s)| s.metric.mount_path).collect()
    }

    #[test]
    fn later_batch_sorts_first_and_keeps_its_order() {
        let stamper = BatchStamper::new();
        let mut rows = stamper.stamp(vec![draft("/old1"), draft("/old2")]);
        rows.extend(stamper.stamp(vec![draft("/a"), draft("/b"), draft("/c")]));
        assert_eq!(sorted(rows), ["/a", "/b", "/c", "/old1", "/old2"]);
    }

    #[test]
    fn batch_shares_a_timestamp_but_not_an_id() {
        let rows = BatchStamper::new().stamp(vec![draft("/a"), draft("/b")]);
        assert_eq!(rows[0].1.updated_at_ms, rows[1].1.updated_at_ms);
        assert_ne!(rows[0].1.uuid, rows[1].1.uuid);
    }

    #[test]
    fn empty_batch_consumes_no_order() {
        let stamper = BatchStamper::new();
        assert!(stamper.stamp(Vec::new()).is_empty());
        let rows = stamper.stamp(vec![draft("/a")]);
        assert_eq!(rows[0].0, 1);
    }
}
