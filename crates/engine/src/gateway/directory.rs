use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use alertdesk_common::wire::AppValidation;
use async_trait::async_trait;

pub const APP_NOT_FOUND: &str = "App ID not found.";

/// The authority that knows which app ids exist.
#[async_trait]
pub trait AppDirectory: Send + Sync {
    async fn check(&self, app_id: &str) -> Result<AppValidation, DirectoryError>;
}

#[derive(Debug)]
pub enum DirectoryError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl DirectoryError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(code) => *code >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// In-memory directory with a fixed set of known ids.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    known: HashSet<String>,
    latency: HashMap<String, Duration>,
    default_latency: Duration,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticDirectory {
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// Delays answers for one id, to make a stale check resolve late.
    pub fn with_latency(mut self, app_id: &str, latency: Duration) -> Self {
        self.latency.insert(app_id.to_string(), latency);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppDirectory for StaticDirectory {
    async fn check(&self, app_id: &str) -> Result<AppValidation, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self
            .latency
            .get(app_id)
            .copied()
            .unwrap_or(self.default_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DirectoryError::Transport("directory unavailable".into()));
        }

        Ok(if self.known.contains(app_id) {
            AppValidation {
                valid: true,
                message: String::new(),
            }
        } else {
            AppValidation {
                valid: false,
                message: APP_NOT_FOUND.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_and_unknown_ids() {
        let dir = StaticDirectory::new(["billing"]);
        assert!(dir.check("billing").await.unwrap().valid);

        let miss = dir.check("nope").await.unwrap();
        assert!(!miss.valid);
        assert_eq!(miss.message, APP_NOT_FOUND);
        assert_eq!(dir.calls(), 2);
    }

    #[tokio::test]
    async fn unavailable_directory_errors() {
        let dir = StaticDirectory::new(["billing"]);
        dir.set_unavailable(true);
        let err = dir.check("billing").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!DirectoryError::Status(404).is_transient());
        assert!(DirectoryError::Status(503).is_transient());
        assert!(!DirectoryError::Decode("bad".into()).is_transient());
    }
}
