use super::grammar::{is_email, is_mount_path};
use crate::model::{is_required, AlertChannel, Condition, Field, FileSystemKind};

pub const THRESHOLD_MIN: i64 = 1;
pub const THRESHOLD_MAX: i64 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Checks one raw field value against the rules in force for `channel`.
///
/// Fields the channel does not require always pass, whatever they hold.
pub fn validate_field(field: Field, raw: &str, channel: Option<AlertChannel>) -> Verdict {
    if !is_required(field, channel) {
        return Verdict::pass();
    }
    let value = raw.trim();
    if value.is_empty() {
        return Verdict::fail("is required");
    }

    match field {
        Field::FileSystemKind => check_parse::<FileSystemKind>(value, "must be one of ext4, xfs, nfs"),
        Field::AlertChannel => check_parse::<AlertChannel>(value, "must be one of email, slack, both"),
        Field::Condition => check_parse::<Condition>(value, "must be one of >, <, ="),
        Field::Threshold => check_threshold(value),
        Field::MountPath => {
            if is_mount_path(value) {
                Verdict::pass()
            } else {
                Verdict::fail("must be an absolute path like /var/log")
            }
        }
        Field::Email => {
            if is_email(value) {
                Verdict::pass()
            } else {
                Verdict::fail("must be a valid email address")
            }
        }
        Field::SlackWebhook => Verdict::pass(),
    }
}

fn check_parse<T: std::str::FromStr>(value: &str, reason: &str) -> Verdict {
    match value.parse::<T>() {
        Ok(_) => Verdict::pass(),
        Err(_) => Verdict::fail(reason),
    }
}

fn check_threshold(value: &str) -> Verdict {
    match value.parse::<i64>() {
        Ok(n) if n < THRESHOLD_MIN => Verdict::fail(format!("must be >= {THRESHOLD_MIN}")),
        Ok(n) if n > THRESHOLD_MAX => Verdict::fail(format!("must be <= {THRESHOLD_MAX}")),
        Ok(_) => Verdict::pass(),
        Err(_) => Verdict::fail("must be a whole number"),
    }
}
