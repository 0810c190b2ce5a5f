use std::fmt;
use std::sync::OnceLock;

use reqwest::Url;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use super::document::render;
use super::options::QueryOptions;
use crate::client::EndecaClient;
use crate::error::{EndecaError, Result};
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::xml::XmlDocument;

/// Content type of the request document
pub const CONTENT_TYPE: &str = "application/xml";

/// A single search request
///
/// Options are merged with the client defaults in [`Query::new`]. Everything else
/// is computed on first access and cached for the life of the query, so reading
/// [`Query::response`] twice issues one request.
pub struct Query<'a, T: Transport = HttpTransport> {
    client: &'a EndecaClient<T>,
    raw_options: Value,
    options: QueryOptions,
    body: OnceLock<String>,
    uri: OnceLock<Url>,
    xml: OnceLock<XmlDocument>,
    transport_response: OnceCell<TransportResponse>,
    response: OnceCell<XmlDocument>,
}

impl<'a, T: Transport> Query<'a, T> {
    pub fn new(client: &'a EndecaClient<T>, options: Value) -> Self {
        let normalized = QueryOptions::normalize(client.default_query_options(), &options);
        debug!(
            flags = normalized.flags.len(),
            searches = normalized.searches.len(),
            dimensions = normalized.dimensions.len(),
            has_category = normalized.category.is_some(),
            sorts = normalized.sorts.len(),
            paging = normalized.paging.len(),
            "Normalized query options"
        );

        Self {
            client,
            raw_options: options,
            options: normalized,
            body: OnceLock::new(),
            uri: OnceLock::new(),
            xml: OnceLock::new(),
            transport_response: OnceCell::new(),
            response: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &'a EndecaClient<T> {
        self.client
    }

    /// Options as passed by the caller
    pub fn raw_options(&self) -> &Value {
        &self.raw_options
    }

    /// Options after merging with the client defaults
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Serialized `Query` request document
    pub fn body(&self) -> Result<&str> {
        if let Some(body) = self.body.get() {
            return Ok(body);
        }
        let body = render(&self.options)?;
        debug!(body_size = body.len(), "Rendered query document");
        Ok(self.body.get_or_init(|| body))
    }

    /// Endpoint the query is posted to
    ///
    /// # Errors
    ///
    /// * `EndecaError::InvalidUri` - If the configured API endpoint is not a valid URL
    pub fn uri(&self) -> Result<&Url> {
        if let Some(uri) = self.uri.get() {
            return Ok(uri);
        }
        let api = &self.client.config().api;
        let uri = Url::parse(api).map_err(|e| EndecaError::InvalidUri {
            uri: api.clone(),
            message: e.to_string(),
        })?;
        Ok(self.uri.get_or_init(|| uri))
    }

    /// The request document parsed back into a tree
    pub fn xml(&self) -> Result<&XmlDocument> {
        if let Some(xml) = self.xml.get() {
            return Ok(xml);
        }
        let xml = XmlDocument::parse(self.body()?.as_bytes())?;
        Ok(self.xml.get_or_init(|| xml))
    }

    /// Raw transport response; the request is sent on first call only
    ///
    /// # Errors
    ///
    /// * `EndecaError::InvalidUri` - If the configured API endpoint is not a valid URL
    /// * `EndecaError::RequestError` - If the transport fails to complete the request
    pub async fn transport_response(&self) -> Result<&TransportResponse> {
        self.transport_response
            .get_or_try_init(|| self.send())
            .await
    }

    #[instrument(skip(self), fields(api = %self.client.config().api))]
    async fn send(&self) -> Result<TransportResponse> {
        let request = TransportRequest {
            url: self.uri()?.clone(),
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE.to_string())],
            body: self.body()?.to_string(),
        };

        let response = self.client.transport().post(request).await?;
        info!(
            status = response.status,
            response_size = response.body.len(),
            "Query completed"
        );
        Ok(response)
    }

    /// Parsed response document
    ///
    /// # Errors
    ///
    /// * `EndecaError::ApiError` - If the service answered with a non-success status
    /// * `EndecaError::XmlParseError` - If the response body is not well-formed XML
    /// * any error of [`Query::transport_response`]
    pub async fn response(&self) -> Result<&XmlDocument> {
        self.response
            .get_or_try_init(|| async {
                let response = self.transport_response().await?;
                if !response.is_success() {
                    warn!(status = response.status, "Query failed");
                    return Err(EndecaError::ApiError {
                        status: response.status,
                        message: response.text(),
                    });
                }

                XmlDocument::parse(&response.body).inspect_err(|e| {
                    warn!("Failed to parse response XML: {}", e);
                })
            })
            .await
    }
}

impl<T: Transport> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("uri", &self.uri.get().map(Url::as_str))
            .field("body", &self.body.get())
            .field("options", &self.options)
            .finish()
    }
}
