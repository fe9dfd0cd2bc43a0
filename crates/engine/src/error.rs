use std::fmt;

use crate::notify::Notification;
use crate::submission::RecordKey;

/// A local validation failure on one field, optionally scoped to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub entry: Option<usize>,
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn top_level(field: &str, message: impl Into<String>) -> Self {
        Self {
            entry: None,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn in_entry(entry: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(i) => write!(f, "Metric {}, Field '{}': {}", i + 1, self.field, self.message),
            None => write!(f, "Field '{}': {}", self.field, self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Local field errors; nothing was sent.
    Validation(Vec<FieldError>),
    /// A collection operation used a stale or invalid position.
    IndexOutOfRange { index: usize, len: usize },
    /// The app id could not be verified, or was rejected, by the remote check.
    RemoteValidation(String),
    /// The backend answered with field-indexed violations.
    BackendRejection(Notification),
    /// The backend failed without structured detail, or did not answer in time.
    BackendUnavailable(Notification),
    /// Another operation on the same record has not resolved yet.
    OperationInFlight(RecordKey),
    RecordNotFound(String),
}

impl EngineError {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::BackendRejection(n) | Self::BackendUnavailable(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed ({} errors)", errors.len())?;
                for e in errors {
                    write!(f, "; {e}")?;
                }
                Ok(())
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "entry index {index} out of range (len {len})")
            }
            Self::RemoteValidation(reason) => write!(f, "app id rejected: {reason}"),
            Self::BackendRejection(n) => write!(f, "backend rejected submission: {n}"),
            Self::BackendUnavailable(n) => write!(f, "backend unavailable: {}", n.summary),
            Self::OperationInFlight(key) => write!(f, "an operation on {key} is still pending"),
            Self::RecordNotFound(uuid) => write!(f, "no record with id {uuid}"),
        }
    }
}

impl std::error::Error for EngineError {}
