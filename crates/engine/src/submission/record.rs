use std::fmt;

use alertdesk_common::wire::{Environment, MetricDraft, StoredMetric};
use serde::Serialize;

/// Stable identity of a row in the working list. Server records are keyed by
/// their uuid; rows created optimistically carry a provisional key until the
/// backend assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Server(String),
    Provisional(u64),
}

impl RecordKey {
    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(uuid) => f.write_str(uuid),
            Self::Provisional(n) => write!(f, "provisional#{n}"),
        }
    }
}

/// The app id and environment a rule set belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTarget {
    pub app_id: String,
    pub environment: Environment,
}

impl RuleTarget {
    pub fn new(app_id: impl Into<String>, environment: Environment) -> Self {
        Self {
            app_id: app_id.into(),
            environment,
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.environment.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRecord {
    pub key: RecordKey,
    pub metric: MetricDraft,
    pub uuid: Option<String>,
    pub updated_at_ms: Option<i64>,
}

impl WorkingRecord {
    pub fn provisional(n: u64, metric: MetricDraft) -> Self {
        Self {
            key: RecordKey::Provisional(n),
            metric,
            uuid: None,
            updated_at_ms: None,
        }
    }

    /// Merges the server identity and timestamp into the row.
    pub fn committed(stored: StoredMetric) -> Self {
        Self {
            key: RecordKey::Server(stored.uuid.clone()),
            metric: stored.metric,
            uuid: Some(stored.uuid),
            updated_at_ms: Some(stored.updated_at_ms),
        }
    }
}

impl From<StoredMetric> for WorkingRecord {
    fn from(stored: StoredMetric) -> Self {
        Self::committed(stored)
    }
}
