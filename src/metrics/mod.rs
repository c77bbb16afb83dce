//! Request outcomes, race-free aggregation, and the per-request log sink.
mod aggregator;
mod logging;
mod types;


pub use aggregator::Aggregator;
pub use logging::{LogEntry, RequestLog, open_request_log};
pub use types::{AggregateStats, Outcome, RequestOutcome};
