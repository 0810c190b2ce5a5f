//! Query construction
//!
//! Options are normalized once when a [`Query`] is created; the request document,
//! endpoint URI and response are computed on first access and cached.

pub mod document;
pub mod keys;
pub mod options;
pub mod search;

pub use document::render;
pub use options::QueryOptions;
pub use search::{CONTENT_TYPE, Query};
