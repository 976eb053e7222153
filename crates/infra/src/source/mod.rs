//! Remote catalog feed boundary.
//!
//! A `CatalogSource` returns the raw feed payload; decoding belongs to the
//! caller so that a malformed payload can be told apart from a failed fetch.

pub mod http;
pub mod static_source;
pub mod r#trait;

pub use http::{DEFAULT_FEED_URL, HttpCatalogSource};
pub use static_source::StaticCatalogSource;
pub use r#trait::{CatalogSource, SourceError};
