//! # Endeca Client
//!
//! A Rust client for Endeca on-demand search endpoints. Searches are described
//! as option trees, merged with client-wide defaults, serialized into the
//! service's `Query` XML document and posted over HTTP. Responses come back as a
//! navigable XML tree.
//!
//! ## Features
//!
//! - **Option merging**: per-query options layered over configured defaults
//! - **Fixed wire format**: flags, searches, dimensions, category, sorts and paging
//!   written in the order the service expects
//! - **Lazy evaluation**: document, endpoint and response computed once per query
//! - **Pluggable transport**: `reqwest` by default, any [`Transport`] for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use endeca_client_rs::{ClientConfig, EndecaClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://search.example.com/api")
//!         .with_default_query_options(json!({ "paging": { "perPage": 20 } }));
//!     let client = EndecaClient::new(config)?;
//!
//!     let query = client.query(json!({
//!         "flags": { "navigationOnly": true },
//!         "category": "42",
//!         "sorts": { "price": "asc" },
//!         "paging": { "page": 2 }
//!     }));
//!
//!     println!("{}", query.body()?);
//!
//!     let response = query.response().await?;
//!     for dimension in response.root().descendants_named("Dimension") {
//!         let dimension = endeca_client_rs::Dimension::from_element(dimension);
//!         println!("{}", dimension.get("DimensionName"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod transport;
pub mod xml;

// Re-export main types for convenience
pub use client::EndecaClient;
pub use config::{ClientConfig, DefaultOptions};
pub use error::{EndecaError, Result};
pub use query::{Query, QueryOptions};
pub use response::{Dimension, FieldValue, Fields};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use xml::{XmlDocument, XmlElement, XmlNode};
