use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::Query;
use crate::transport::{HttpTransport, Transport};

/// Client for an Endeca on-demand search endpoint
///
/// Owns the configuration and the transport; each search is a [`Query`] borrowing
/// the client.
#[derive(Debug, Clone)]
pub struct EndecaClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl EndecaClient<HttpTransport> {
    /// Create a client that talks HTTP with `reqwest`
    ///
    /// # Errors
    ///
    /// * `EndecaError::RequestError` - If the HTTP client cannot be built
    ///
    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::{ClientConfig, EndecaClient};
    ///
    /// let client = EndecaClient::new(ClientConfig::new("http://search.example.com/api")).unwrap();
    /// assert_eq!(client.config().api, "http://search.example.com/api");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> EndecaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        debug!(api = %config.api, "Creating Endeca client");
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Default query options every query is merged over
    pub fn default_query_options(&self) -> &Value {
        &self.config.default_options.query
    }

    /// Build a query for this client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use endeca_client_rs::{ClientConfig, EndecaClient};
    /// use serde_json::json;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EndecaClient::new(ClientConfig::new("http://search.example.com/api"))?;
    ///     let query = client.query(json!({ "searches": { "All": "boots" } }));
    ///
    ///     let response = query.response().await?;
    ///     println!("Root element: {}", response.root().name());
    ///     Ok(())
    /// }
    /// ```
    pub fn query(&self, options: Value) -> Query<'_, T> {
        Query::new(self, options)
    }
}
