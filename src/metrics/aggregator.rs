use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{AggregateStats, RequestOutcome};

/// Shared accumulator written by every worker.
///
/// All counters live behind one lock, so a record is applied as a unit and a
/// snapshot never observes a half-applied update. A poisoned lock is taken
/// over, never skipped.
#[derive(Debug, Default)]
pub struct Aggregator {
    stats: Mutex<AggregateStats>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &RequestOutcome) {
        self.lock().record(outcome);
    }

    #[must_use]
    pub fn snapshot(&self) -> AggregateStats {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, AggregateStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
