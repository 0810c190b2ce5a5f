//! HTTP transport seam
//!
//! Requests and responses are described as plain data. [`HttpTransport`] executes
//! them with `reqwest`; tests and embedders can plug in any other [`Transport`].

use std::future::Future;

use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::Result;

/// A POST request described as plain data
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A response described as plain data
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes outbound requests for a client
///
/// Implementations report connection-level failures as errors and return every
/// HTTP response, whatever its status, as a [`TransportResponse`].
pub trait Transport: Send + Sync {
    fn post(&self, request: TransportRequest)
    -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// Default transport backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport using the timeout and user agent of `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url, body_size = request.body.len()))]
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.post(request.url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("Sending query document");
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, response_size = body.len(), "Received response");
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
