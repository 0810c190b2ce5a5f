//! Client configuration
//!
//! Holds the API endpoint and the default options every query starts from.
//! Configuration can be assembled with the builder methods or deserialized,
//! e.g. from YAML:
//!
//! ```
//! use endeca_client_rs::ClientConfig;
//!
//! let config = ClientConfig::from_yaml_str(
//!     r#"
//! api: "http://search.example.com/api"
//! default_options:
//!   query:
//!     flags:
//!       navigationOnly: false
//!     paging:
//!       perPage: 10
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.api, "http://search.example.com/api");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EndecaError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default options applied to every query built by a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultOptions {
    /// Option tree with the same shape as the per-query options
    #[serde(default)]
    pub query: Value,
}

/// Configuration for [`EndecaClient`](crate::EndecaClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint that receives the `Query` documents
    pub api: String,

    #[serde(default)]
    pub default_options: DefaultOptions,

    /// HTTP request timeout, in seconds when (de)serialized
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Custom user agent; defaults to `endeca-client-rs/<version>`
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given API endpoint with no default options
    ///
    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::ClientConfig;
    ///
    /// let config = ClientConfig::new("http://search.example.com/api");
    /// assert!(config.default_options.query.is_null());
    /// ```
    pub fn new<S: Into<String>>(api: S) -> Self {
        Self {
            api: api.into(),
            default_options: DefaultOptions::default(),
            timeout: default_timeout(),
            user_agent: None,
        }
    }

    /// Set the default query options merged under every query's own options
    ///
    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::ClientConfig;
    /// use serde_json::json;
    ///
    /// let config = ClientConfig::new("http://search.example.com/api")
    ///     .with_default_query_options(json!({ "dimensions": [1, 2] }));
    /// ```
    pub fn with_default_query_options(mut self, query: Value) -> Self {
        self.default_options.query = query;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("endeca-client-rs/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Load a configuration from a YAML document
    ///
    /// # Errors
    ///
    /// * `EndecaError::ConfigError` - If the document is not valid YAML or misses `api`
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EndecaError::ConfigError {
            message: e.to_string(),
        })
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
