use reqwest::Client;

use crate::{args::DEFAULT_USER_AGENT, engine::RunConfig, error::HttpError};

use super::transport::HttpTransport;

/// Idle connections a worker keeps to the target; one worker issues one
/// request at a time.
const WORKER_POOL_IDLE: usize = 1;

/// Builds one transport per virtual user, each with its own connection pool.
///
/// # Errors
///
/// Returns an error when a client cannot be built (for example when the TLS
/// backend fails to initialize).
pub fn build_transports(config: &RunConfig) -> Result<Vec<HttpTransport>, HttpError> {
    (0..config.concurrency)
        .map(|worker| {
            build_client(config, worker).map(|client| HttpTransport::new(client, config))
        })
        .collect()
}

fn build_client(config: &RunConfig, worker: usize) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(WORKER_POOL_IDLE)
        .build()
        .map_err(|err| HttpError::BuildClient {
            worker,
            source: err,
        })
}
