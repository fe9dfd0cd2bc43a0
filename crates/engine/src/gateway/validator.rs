use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alertdesk_common::seq::SeqCounter;
use tokio::sync::watch;

use super::directory::{AppDirectory, APP_NOT_FOUND};
use crate::config::AppCheckConfig;

pub const CHECK_FAILED: &str = "App ID could not be verified.";
pub const CHECK_TIMED_OUT: &str = "App ID check timed out.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppIdStatus {
    /// Nothing to check yet: the value is empty.
    Unvalidated,
    Checking,
    Valid,
    Invalid { reason: String },
}

impl AppIdStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Checking)
    }
}

/// The status of the most recently requested value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdVerdict {
    pub seq: u64,
    pub value: String,
    pub status: AppIdStatus,
}

/// Debounced, supersede-by-sequence app id checker.
///
/// Every `validate` call takes a new sequence number. The spawned check waits
/// out the debounce, skips the remote call entirely if a newer value arrived
/// meanwhile, and only writes its verdict back if its sequence number is still
/// the latest one. Transport failures and timeouts resolve to `Invalid`.
pub struct AppIdGateway {
    directory: Arc<dyn AppDirectory>,
    debounce: Duration,
    timeout: Duration,
    seq: Arc<SeqCounter>,
    state: Arc<watch::Sender<AppIdVerdict>>,
    checks: Arc<AtomicUsize>,
}

impl AppIdGateway {
    pub fn new(directory: Arc<dyn AppDirectory>, config: &AppCheckConfig) -> Self {
        let (tx, _) = watch::channel(AppIdVerdict {
            seq: 0,
            value: String::new(),
            status: AppIdStatus::Unvalidated,
        });
        Self {
            directory,
            debounce: config.debounce(),
            timeout: config.timeout(),
            seq: Arc::new(SeqCounter::new()),
            state: Arc::new(tx),
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Records a new app id value and arms a check for it. Must be called
    /// from within a tokio runtime. Returns the request's sequence number.
    pub fn validate(&self, app_id: &str) -> u64 {
        let seq = self.seq.next();
        let value = app_id.trim().to_string();

        if value.is_empty() {
            self.state.send_replace(AppIdVerdict {
                seq,
                value,
                status: AppIdStatus::Unvalidated,
            });
            return seq;
        }

        self.state.send_replace(AppIdVerdict {
            seq,
            value: value.clone(),
            status: AppIdStatus::Checking,
        });

        let directory = Arc::clone(&self.directory);
        let latest = Arc::clone(&self.seq);
        let state = Arc::clone(&self.state);
        let checks = Arc::clone(&self.checks);
        let (debounce, timeout) = (self.debounce, self.timeout);

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !latest.is_latest(seq) {
                tracing::debug!(seq, app_id = %value, "app id check superseded before issue");
                return;
            }

            checks.fetch_add(1, Ordering::SeqCst);
            let status = match tokio::time::timeout(timeout, directory.check(&value)).await {
                Ok(Ok(answer)) if answer.valid => AppIdStatus::Valid,
                Ok(Ok(answer)) => AppIdStatus::Invalid {
                    reason: if answer.message.trim().is_empty() {
                        APP_NOT_FOUND.to_string()
                    } else {
                        answer.message
                    },
                },
                Ok(Err(e)) => {
                    tracing::warn!(seq, app_id = %value, error = %e, "app id check failed");
                    AppIdStatus::Invalid {
                        reason: CHECK_FAILED.to_string(),
                    }
                }
                Err(_) => {
                    tracing::warn!(seq, app_id = %value, ?timeout, "app id check timed out");
                    AppIdStatus::Invalid {
                        reason: CHECK_TIMED_OUT.to_string(),
                    }
                }
            };

            let applied = state.send_if_modified(|current| {
                if current.seq != seq {
                    return false;
                }
                current.status = status;
                true
            });
            if applied {
                tracing::debug!(seq, app_id = %value, "app id verdict applied");
            } else {
                tracing::debug!(seq, app_id = %value, "stale app id verdict discarded");
            }
        });

        seq
    }

    pub fn verdict(&self) -> AppIdVerdict {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> AppIdStatus {
        self.state.borrow().status.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppIdVerdict> {
        self.state.subscribe()
    }

    /// Waits until the latest value has a verdict.
    pub async fn settled(&self) -> AppIdVerdict {
        let mut rx = self.state.subscribe();
        let verdict = match rx.wait_for(|v| v.status.is_settled()).await {
            Ok(v) => v.clone(),
            Err(_) => self.verdict(),
        };
        verdict
    }

    /// Remote checks actually issued, after debounce and supersede.
    pub fn checks_issued(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}
