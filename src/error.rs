use std::result;

use thiserror::Error;

/// Error types for Endeca client operations
#[derive(Error, Debug)]
pub enum EndecaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Writing the request document failed
    #[error("XML serialization failed: {0}")]
    XmlError(String),

    /// Response document is not well-formed
    #[error("XML parsing error: {message}")]
    XmlParseError { message: String },

    /// Configured API endpoint could not be parsed
    #[error("Invalid API endpoint {uri:?}: {message}")]
    InvalidUri { uri: String, message: String },

    /// Service answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Client configuration could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

pub type Result<T> = result::Result<T, EndecaError>;

impl EndecaError {
    pub(crate) fn parse(message: impl ToString) -> Self {
        EndecaError::XmlParseError {
            message: message.to_string(),
        }
    }
}
