use std::sync::atomic::{AtomicU64, Ordering};

/// Run-wide cap on the number of requests, shared by all workers.
#[derive(Debug)]
pub struct RequestLimiter {
    limit: u64,
    counter: AtomicU64,
}

impl RequestLimiter {
    #[must_use]
    pub fn new(limit: Option<u64>) -> Option<Self> {
        limit.map(|limit| RequestLimiter {
            limit,
            counter: AtomicU64::new(0),
        })
    }

    /// Claims one request slot. Returns `false` once the cap is reached.
    #[must_use]
    pub fn try_reserve(&self) -> bool {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            if current >= self.limit {
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                return false;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    #[must_use]
    pub fn reserved(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
