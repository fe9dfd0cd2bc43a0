use std::collections::BTreeMap;

use alertdesk_common::wire::MetricDraft;

use crate::error::FieldError;
use crate::model::{AlertChannel, Condition, Field, FileSystemKind};

/// Immutable plain values of one entry, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    values: BTreeMap<Field, String>,
}

impl EntrySnapshot {
    pub(crate) fn new(values: BTreeMap<Field, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }

    /// Converts to the typed wire form. `index` scopes any error messages.
    pub fn to_draft(&self, index: usize) -> Result<MetricDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let file_system_kind = self.parse::<FileSystemKind>(index, Field::FileSystemKind, &mut errors);
        let alert_channel = self.parse::<AlertChannel>(index, Field::AlertChannel, &mut errors);
        let condition = self.parse::<Condition>(index, Field::Condition, &mut errors);
        let threshold = self.parse::<u8>(index, Field::Threshold, &mut errors);
        let mount_path = self.get(Field::MountPath).unwrap_or_default().to_string();
        let email = self.get(Field::Email).map(str::to_string);
        let slack_webhook = self.get(Field::SlackWebhook).map(str::to_string);

        match (file_system_kind, alert_channel, condition, threshold) {
            (Some(file_system_kind), Some(alert_channel), Some(condition), Some(threshold))
                if errors.is_empty() =>
            {
                Ok(MetricDraft {
                    file_system_kind,
                    alert_channel,
                    condition,
                    threshold,
                    mount_path,
                    email,
                    slack_webhook,
                })
            }
            _ => Err(errors),
        }
    }

    fn parse<T: std::str::FromStr>(
        &self,
        index: usize,
        field: Field,
        errors: &mut Vec<FieldError>,
    ) -> Option<T> {
        let raw = self.get(field).unwrap_or_default();
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push(FieldError::in_entry(index, field.name(), format!("invalid value '{raw}'")));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(Field, &str)]) -> EntrySnapshot {
        EntrySnapshot::new(pairs.iter().map(|(f, v)| (*f, v.to_string())).collect())
    }

    #[test]
    fn converts_complete_snapshot() {
        let snap = snapshot(&[
            (Field::FileSystemKind, "nfs"),
            (Field::AlertChannel, "email"),
            (Field::Condition, "<"),
            (Field::Threshold, "5"),
            (Field::MountPath, "/mnt/share"),
            (Field::Email, "ops@example.com"),
        ]);
        let draft = snap.to_draft(0).unwrap();
        assert_eq!(draft.threshold, 5);
        assert_eq!(draft.email.as_deref(), Some("ops@example.com"));
        assert!(draft.slack_webhook.is_none());
    }

    #[test]
    fn reports_unparseable_fields_with_index() {
        let snap = snapshot(&[
            (Field::FileSystemKind, "ext4"),
            (Field::AlertChannel, "email"),
            (Field::Condition, ">"),
            (Field::Threshold, "abc"),
            (Field::MountPath, "/"),
        ]);
        let errors = snap.to_draft(2).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Metric 3, Field 'threshold': invalid value 'abc'");
    }
}
