use std::future::Future;
use std::time::Duration;

/// Exponential backoff between attempts, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            ..Self::default()
        }
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry.saturating_sub(1) as i32);
        self.base_delay.mul_f64(factor).min(self.max_delay)
    }
}

/// Calls `op` until it succeeds, `should_retry` rejects the error, or the
/// policy's attempts run out. The last error is returned.
pub async fn retry_async<Op, Fut, T, E>(
    policy: &RetryPolicy,
    should_retry: impl Fn(&E) -> bool,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts.max(1);
    let mut retry = 0;
    loop {
        let err = match op().await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        retry += 1;
        if retry >= attempts || !should_retry(&err) {
            return Err(err);
        }
        let pause = policy.delay_before(retry);
        tracing::warn!(retry, attempts, error = %err, pause_ms = pause.as_millis() as u64, "transient failure");
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting<'a>(calls: &'a AtomicU32, succeed_on: u32) -> impl FnMut() -> std::future::Ready<Result<u32, String>> + 'a {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= succeed_on { Ok(n) } else { Err(format!("call {n}")) })
        }
    }

    #[test]
    fn delays_grow_and_cap() {
        let policy = RetryPolicy {
            attempts: 10,
            base_delay: Duration::from_millis(100),
            multiplier: 3.0,
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_before(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Duration::from_millis(300));
        assert_eq!(policy.delay_before(3), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let out = retry_async(&RetryPolicy::default(), |_| true, counting(&calls, 3)).await;
        assert_eq!(out, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_with_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: 2,
            ..RetryPolicy::default()
        };
        let out = retry_async(&policy, |_| true, counting(&calls, 99)).await;
        assert_eq!(out, Err("call 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let out = retry_async(&RetryPolicy::default(), |_: &String| false, counting(&calls, 99)).await;
        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn none_policy_tries_once() {
        let calls = AtomicU32::new(0);
        let _ = retry_async(&RetryPolicy::none(), |_| true, counting(&calls, 99)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
