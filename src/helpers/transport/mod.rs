//! HTTP transport used for both the metadata lookup and the icon download.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Settings;

/// Status and body of a completed request. Non-success statuses are not
/// errors at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    status: u16,
    bytes: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            bytes: bytes.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to GET from '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// reqwest-backed transport with the configured timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent())
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let request_err = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };

        let res = self.client.get(url).send().await.map_err(request_err)?;
        let status = res.status();
        debug!("GET {url} -> {status}");

        let bytes = res.bytes().await.map_err(request_err)?;
        Ok(FetchResponse::new(status.as_u16(), bytes.to_vec()))
    }
}
