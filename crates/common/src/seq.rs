use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter handing out request sequence numbers.
///
/// `next` returns the freshly issued number; `current` is the last one issued
/// (zero before the first call).
#[derive(Debug, Default)]
pub struct SeqCounter {
    last: AtomicU64,
}

impl SeqCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.current() == seq
    }
}
