use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    engine::{RunConfig, run_scheduler},
    error::{AppError, AppResult},
    http::build_transports,
    metrics::{Aggregator, open_request_log},
    shutdown::{setup_signal_shutdown_handler, shutdown_channel, shutdown_requested},
};

use super::summary::Report;

/// Runs one load test against the configured target and reports on it.
///
/// Everything that can fail at startup (clients, request log) is set up
/// before the first worker starts.
///
/// # Errors
///
/// Returns an error when a client or the request log cannot be created, or
/// when a worker task terminated abnormally.
pub(crate) async fn run_local(config: RunConfig, request_log: Option<&Path>) -> AppResult<Report> {
    let transports = build_transports(&config).map_err(AppError::http)?;

    let (log, log_writer) = match request_log {
        Some(path) => {
            let (log, writer) = open_request_log(path).await.map_err(AppError::sink)?;
            info!("Writing request log to {}.", path.display());
            (Some(log), Some(writer))
        }
        None => (None, None),
    };

    let (shutdown_tx, mut interrupt_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let aggregator = Arc::new(Aggregator::new());
    let config = Arc::new(config);

    let result = run_scheduler(&config, transports, &aggregator, log, &shutdown_tx).await;

    let interrupted = shutdown_requested(&mut interrupt_rx);
    if !interrupted {
        drop(shutdown_tx.send(()));
    }
    if let Err(err) = signal_handle.await {
        debug!("Signal handler task ended abnormally: {}", err);
    }

    if let Some(writer) = log_writer {
        match writer.await {
            Ok(Ok(lines)) => debug!("Request log closed after {} lines.", lines),
            Ok(Err(err)) => warn!("Request log incomplete: {}", err),
            Err(err) => warn!("Request log writer failed: {}", err),
        }
    }

    let timing = result?;
    let stats = aggregator.snapshot();
    if interrupted {
        warn!("Run interrupted; summary covers completed requests only.");
    }
    info!(
        "Run finished: {} requests in {:.2}s.",
        timing.requests,
        timing.wall_clock.as_secs_f64()
    );

    let mut report = Report::new(&config.target, &stats, timing.wall_clock);
    report.interrupted = interrupted;
    Ok(report)
}
