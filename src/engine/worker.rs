use std::sync::Arc;

use rand::rngs::StdRng;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::{
    http::Transport,
    metrics::{Aggregator, LogEntry, RequestLog, RequestOutcome},
    shutdown::{ShutdownReceiver, shutdown_requested, wait_for_shutdown},
};

use super::{Identity, RequestLimiter, RunConfig};

pub(super) struct WorkerContext<T> {
    pub(super) id: usize,
    pub(super) transport: T,
    pub(super) config: Arc<RunConfig>,
    pub(super) aggregator: Arc<Aggregator>,
    pub(super) log: Option<RequestLog>,
    pub(super) limiter: Option<Arc<RequestLimiter>>,
    pub(super) end: Instant,
    pub(super) shutdown_rx: ShutdownReceiver,
    pub(super) rng: StdRng,
}

/// Virtual-user loop. Returns the number of requests issued.
///
/// The end instant is only checked between requests: an in-flight request
/// always completes.
pub(super) async fn run_worker<T: Transport>(mut ctx: WorkerContext<T>) -> u64 {
    let mut issued: u64 = 0;

    while Instant::now() < ctx.end {
        if shutdown_requested(&mut ctx.shutdown_rx) {
            break;
        }
        if let Some(limiter) = ctx.limiter.as_ref()
            && !limiter.try_reserve()
        {
            break;
        }

        let identity = ctx.config.identities.choose(&mut ctx.rng);
        let outcome = issue_request(&ctx.transport, identity).await;
        if let Some(error) = outcome.error.as_deref() {
            debug!("Worker {} request failed: {}", ctx.id, error);
        }
        ctx.aggregator.record(&outcome);
        issued = issued.saturating_add(1);

        if let Some(log) = ctx.log.as_ref()
            && !log.send(LogEntry::now(ctx.id, outcome))
        {
            debug!("Worker {} lost the request log; continuing without it.", ctx.id);
            ctx.log = None;
        }

        // Paced on success and failure alike, never past the end instant.
        let pause = ctx.config.think.sample(&mut ctx.rng);
        let wake = Instant::now()
            .checked_add(pause)
            .map_or(ctx.end, |wake| wake.min(ctx.end));
        tokio::select! {
            () = wait_for_shutdown(&mut ctx.shutdown_rx) => break,
            () = sleep_until(wake) => {}
        }
    }

    issued
}

async fn issue_request<T: Transport>(transport: &T, identity: &Identity) -> RequestOutcome {
    let start = Instant::now();
    let result = transport.send(identity).await;
    let elapsed = start.elapsed();
    match result {
        Ok(status) => RequestOutcome::response(status, elapsed, identity.as_str()),
        Err(err) => {
            let elapsed = (!err.is_build_failure()).then_some(elapsed);
            RequestOutcome::failure(elapsed, identity.as_str(), err.to_string())
        }
    }
}
