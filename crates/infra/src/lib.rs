//! Infrastructure layer: product storage and the remote feed client.

pub mod source;
pub mod store;

pub use source::{CatalogSource, DEFAULT_FEED_URL, HttpCatalogSource, SourceError, StaticCatalogSource};
pub use store::{
    ChangeSet, InMemoryProductStore, ProductStore, SqliteProductStore, StoreError, default_database_path,
    default_database_url,
};
