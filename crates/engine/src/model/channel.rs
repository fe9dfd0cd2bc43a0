use super::field::Field;
use super::AlertChannel;

/// Fields every entry requires regardless of alert channel.
pub const BASE_FIELDS: [Field; 5] = [
    Field::FileSystemKind,
    Field::AlertChannel,
    Field::Condition,
    Field::Threshold,
    Field::MountPath,
];

/// Channel -> required delivery fields. An unset channel requires neither.
pub fn dependent_fields(channel: Option<AlertChannel>) -> &'static [Field] {
    match channel {
        Some(AlertChannel::Email) => &[Field::Email],
        Some(AlertChannel::Slack) => &[Field::SlackWebhook],
        Some(AlertChannel::Both) => &[Field::Email, Field::SlackWebhook],
        None => &[],
    }
}

pub fn is_required(field: Field, channel: Option<AlertChannel>) -> bool {
    BASE_FIELDS.contains(&field) || dependent_fields(channel).contains(&field)
}

pub fn required_fields(channel: Option<AlertChannel>) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|f| is_required(*f, channel))
        .collect()
}
