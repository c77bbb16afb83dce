use async_trait::async_trait;
use reqwest::{Client, Method, header::HeaderName};
use url::Url;

use crate::{engine::Identity, engine::RunConfig, error::HttpError};

/// One virtual user's connection to the target.
///
/// Implementations resolve to the response status code. A request that could
/// not be built must return [`HttpError::BuildRequest`]; every other failure is
/// a transport failure.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, identity: &Identity) -> Result<u16, HttpError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    method: Method,
    target: Url,
    identity_header: HeaderName,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: Client, config: &RunConfig) -> Self {
        Self {
            client,
            method: config.method.as_reqwest(),
            target: config.target.clone(),
            identity_header: config.identity_header.clone(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, identity: &Identity) -> Result<u16, HttpError> {
        let request = self
            .client
            .request(self.method.clone(), self.target.clone())
            .header(self.identity_header.clone(), identity.header_value().clone())
            .build()
            .map_err(|err| HttpError::BuildRequest { source: err })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| HttpError::Transport { source: err })?;
        let status = response.status().as_u16();
        // Drain the body so the connection goes back to this worker's pool.
        response
            .bytes()
            .await
            .map_err(|err| HttpError::Transport { source: err })?;
        Ok(status)
    }
}
