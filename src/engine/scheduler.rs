use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::{
    error::{AppError, AppResult, HttpError, ValidationError},
    http::Transport,
    metrics::{Aggregator, RequestLog},
    shutdown::ShutdownSender,
};

use super::worker::{WorkerContext, run_worker};
use super::{RequestLimiter, RunConfig};

#[derive(Debug, Clone, Copy)]
pub struct RunTiming {
    pub started: Instant,
    /// From the shared start instant to the last worker join. Can exceed the
    /// configured duration by the longest in-flight request.
    pub wall_clock: Duration,
    pub requests: u64,
}

/// Runs one virtual user per transport until the shared end instant, then
/// joins them all.
///
/// An empty transport list or a zero duration completes at once without
/// issuing requests.
///
/// # Errors
///
/// Returns an error when the end instant cannot be represented, or after all
/// workers joined when any worker task terminated abnormally.
pub async fn run_scheduler<T: Transport>(
    config: &Arc<RunConfig>,
    transports: Vec<T>,
    aggregator: &Arc<Aggregator>,
    log: Option<RequestLog>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunTiming> {
    let limiter = RequestLimiter::new(config.max_requests).map(Arc::new);
    let started = Instant::now();
    let end = started
        .checked_add(config.duration)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;

    info!(
        "Starting {} virtual users against {} for {}s.",
        transports.len(),
        config.target,
        config.duration.as_secs()
    );

    let mut workers = JoinSet::new();
    for (id, transport) in transports.into_iter().enumerate() {
        workers.spawn(run_worker(WorkerContext {
            id,
            transport,
            config: Arc::clone(config),
            aggregator: Arc::clone(aggregator),
            log: log.clone(),
            limiter: limiter.clone(),
            end,
            shutdown_rx: shutdown_tx.subscribe(),
            rng: StdRng::from_entropy(),
        }));
    }
    drop(log);

    let mut requests: u64 = 0;
    let mut failed_workers: usize = 0;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(issued) => {
                debug!("Worker finished after {} requests.", issued);
                requests = requests.saturating_add(issued);
            }
            Err(err) => {
                error!("Worker task failed: {}", err);
                failed_workers = failed_workers.saturating_add(1);
            }
        }
    }
    let wall_clock = started.elapsed();

    if failed_workers > 0 {
        return Err(AppError::http(HttpError::WorkersFailed {
            count: failed_workers,
        }));
    }

    Ok(RunTiming {
        started,
        wall_clock,
        requests,
    })
}
