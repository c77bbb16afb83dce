use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client for worker {worker}: {source}")]
    BuildClient {
        worker: usize,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("{count} worker task(s) terminated abnormally.")]
    WorkersFailed { count: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}

impl HttpError {
    /// The request never reached the transport, so no latency was observed.
    #[must_use]
    pub const fn is_build_failure(&self) -> bool {
        matches!(self, HttpError::BuildRequest { .. })
    }
}
