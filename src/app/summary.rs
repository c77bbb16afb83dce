use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::metrics::AggregateStats;

/// End-of-run report derived from the aggregate after every worker joined.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Report {
    pub(crate) target: String,
    pub(crate) total_requests: u64,
    pub(crate) successful_requests: u64,
    pub(crate) failed_requests: u64,
    pub(crate) average_latency_secs: f64,
    pub(crate) requests_per_sec: f64,
    pub(crate) total_duration_secs: f64,
    pub(crate) interrupted: bool,
}

impl Report {
    #[must_use]
    pub(crate) fn new(target: &Url, stats: &AggregateStats, wall_clock: Duration) -> Self {
        let average_latency_secs = if stats.latency_count > 0 {
            stats.latency_sum.as_secs_f64() / stats.latency_count as f64
        } else {
            0.0
        };
        let total_duration_secs = wall_clock.as_secs_f64();
        let requests_per_sec = if total_duration_secs > 0.0 {
            stats.total as f64 / total_duration_secs
        } else {
            0.0
        };

        Self {
            target: target.to_string(),
            total_requests: stats.total,
            successful_requests: stats.success_count,
            failed_requests: stats.failure_count,
            average_latency_secs,
            requests_per_sec,
            total_duration_secs,
            interrupted: false,
        }
    }
}

/// Formats the report for stdout.
///
/// # Errors
///
/// Returns an error when JSON serialization fails.
pub(crate) fn render_report(report: &Report, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)?),
    }
}

fn render_text(report: &Report) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Target: {}", report.target)?;
    writeln!(out, "Total Requests: {}", report.total_requests)?;
    writeln!(out, "Successful Requests: {}", report.successful_requests)?;
    writeln!(out, "Failed Requests: {}", report.failed_requests)?;
    writeln!(out, "Average Latency: {:.4}s", report.average_latency_secs)?;
    writeln!(out, "Requests/sec: {:.2}", report.requests_per_sec)?;
    write!(out, "Total Duration: {:.2}s", report.total_duration_secs)?;
    if report.interrupted {
        write!(out, "\nInterrupted: summary covers completed requests only")?;
    }
    Ok(out)
}
