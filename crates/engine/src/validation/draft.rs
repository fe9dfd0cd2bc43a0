use std::collections::BTreeMap;

use alertdesk_common::wire::MetricDraft;

use super::rules::validate_field;
use crate::model::Field;

/// Runs the field rules over an already-typed draft, as a backend would
/// before accepting it.
pub fn validate_draft(draft: &MetricDraft) -> Vec<(Field, String)> {
    let channel = Some(draft.alert_channel);
    Field::ALL
        .into_iter()
        .filter_map(|field| {
            let raw = raw_value(draft, field);
            validate_field(field, &raw, channel)
                .reason
                .map(|reason| (field, reason))
        })
        .collect()
}

/// Per-entry, per-field violations keyed by entry position; entries without
/// violations are absent.
pub fn structured_violations(drafts: &[MetricDraft]) -> BTreeMap<usize, BTreeMap<String, Vec<String>>> {
    let mut out = BTreeMap::new();
    for (index, draft) in drafts.iter().enumerate() {
        let violations = validate_draft(draft);
        if violations.is_empty() {
            continue;
        }
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, reason) in violations {
            fields.entry(field.name().to_string()).or_default().push(reason);
        }
        out.insert(index, fields);
    }
    out
}

fn raw_value(draft: &MetricDraft, field: Field) -> String {
    match field {
        Field::FileSystemKind => draft.file_system_kind.as_str().to_string(),
        Field::AlertChannel => draft.alert_channel.as_str().to_string(),
        Field::Condition => draft.condition.as_str().to_string(),
        Field::Threshold => draft.threshold.to_string(),
        Field::MountPath => draft.mount_path.clone(),
        Field::Email => draft.email.clone().unwrap_or_default(),
        Field::SlackWebhook => draft.slack_webhook.clone().unwrap_or_default(),
    }
}
