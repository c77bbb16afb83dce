use std::time::Duration;

/// Status code that classifies a response as a success.
pub const OK_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Result of one attempted request. Consumed right after it is recorded.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Time to response or time to failure; `None` when the request never left
    /// the worker (it could not be built).
    pub elapsed: Option<Duration>,
    pub status: Option<u16>,
    pub outcome: Outcome,
    pub identity: String,
    pub error: Option<String>,
}

impl RequestOutcome {
    #[must_use]
    pub fn response(status: u16, elapsed: Duration, identity: &str) -> Self {
        let outcome = if status == OK_STATUS {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        Self {
            elapsed: Some(elapsed),
            status: Some(status),
            outcome,
            identity: identity.to_owned(),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(elapsed: Option<Duration>, identity: &str, error: String) -> Self {
        Self {
            elapsed,
            status: None,
            outcome: Outcome::Failure,
            identity: identity.to_owned(),
            error: Some(error),
        }
    }
}

/// Run-wide counters. `total == success_count + failure_count` after every
/// completed [`AggregateStats::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub latency_sum: Duration,
    pub latency_count: u64,
}

impl AggregateStats {
    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.total = self.total.saturating_add(1);
        match outcome.outcome {
            Outcome::Success => self.success_count = self.success_count.saturating_add(1),
            Outcome::Failure => self.failure_count = self.failure_count.saturating_add(1),
        }
        if let Some(elapsed) = outcome.elapsed {
            self.latency_sum = self.latency_sum.saturating_add(elapsed);
            self.latency_count = self.latency_count.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        match self.success_count.checked_add(self.failure_count) {
            Some(sum) => sum == self.total,
            None => false,
        }
    }
}
