use std::collections::BTreeMap;

use alertdesk_common::wire::MetricDraft;

use super::snapshot::EntrySnapshot;
use crate::error::FieldError;
use crate::model::{is_required, AlertChannel, Field};
use crate::validation::validate_field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// No rule applies to the field under the current alert channel.
    Unconstrained,
    Valid,
    Invalid(String),
}

/// One metric row being edited: raw values plus the validity of every
/// field the current alert channel constrains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    values: BTreeMap<Field, String>,
    states: BTreeMap<Field, FieldState>,
}

impl Default for EntryRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryRecord {
    pub fn new() -> Self {
        let mut record = Self {
            values: Field::ALL.into_iter().map(|f| (f, String::new())).collect(),
            states: BTreeMap::new(),
        };
        for field in Field::ALL {
            record.recompute(field);
        }
        record
    }

    pub fn from_draft(draft: &MetricDraft) -> Self {
        let mut record = Self::new();
        record.set(Field::FileSystemKind, draft.file_system_kind.as_str());
        record.set(Field::AlertChannel, draft.alert_channel.as_str());
        record.set(Field::Condition, draft.condition.as_str());
        record.set(Field::Threshold, &draft.threshold.to_string());
        record.set(Field::MountPath, &draft.mount_path);
        record.set(Field::Email, draft.email.as_deref().unwrap_or_default());
        record.set(Field::SlackWebhook, draft.slack_webhook.as_deref().unwrap_or_default());
        record
    }

    /// Writes a raw value and revalidates it. A channel write also revalidates
    /// the delivery fields, clearing the state of any that lost their rule.
    /// Returns the fields whose state was recomputed.
    pub fn set(&mut self, field: Field, value: &str) -> Vec<Field> {
        self.values.insert(field, value.to_string());

        let mut touched = vec![field];
        if field == Field::AlertChannel {
            touched.extend([Field::Email, Field::SlackWebhook]);
        }
        for f in &touched {
            self.recompute(*f);
        }
        touched
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn state(&self, field: Field) -> FieldState {
        self.states
            .get(&field)
            .cloned()
            .unwrap_or(FieldState::Unconstrained)
    }

    pub fn channel(&self) -> Option<AlertChannel> {
        self.value(Field::AlertChannel).trim().parse().ok()
    }

    pub fn is_valid(&self) -> bool {
        self.states
            .values()
            .all(|s| !matches!(s, FieldState::Invalid(_)))
    }

    pub fn errors(&self, index: usize) -> Vec<FieldError> {
        self.states
            .iter()
            .filter_map(|(field, state)| match state {
                FieldState::Invalid(reason) => Some(FieldError::in_entry(index, field.name(), reason.clone())),
                _ => None,
            })
            .collect()
    }

    /// Plain values of the fields the current channel requires; delivery
    /// fields the channel ignores are left out.
    pub fn snapshot(&self) -> EntrySnapshot {
        let channel = self.channel();
        let values = Field::ALL
            .into_iter()
            .filter(|f| is_required(*f, channel))
            .map(|f| (f, self.value(f).trim().to_string()))
            .collect();
        EntrySnapshot::new(values)
    }

    fn recompute(&mut self, field: Field) {
        let channel = self.channel();
        if !is_required(field, channel) {
            self.states.remove(&field);
            return;
        }
        let verdict = validate_field(field, self.value(field), channel);
        let state = if verdict.valid {
            FieldState::Valid
        } else {
            FieldState::Invalid(verdict.reason.unwrap_or_default())
        };
        self.states.insert(field, state);
    }
}
