//! Catalog operation errors.

use empower_infra::{SourceError, StoreError};
use empower_products::FeedError;
use thiserror::Error;

/// Failure of a catalog operation.
///
/// Every variant is returned to the caller; nothing is retried. See
/// `Session` for the policy the client applies on top.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The feed could not be fetched.
    #[error("network failure: {0}")]
    Network(#[source] SourceError),

    /// The feed was fetched but is not a valid product list.
    #[error("decode failure: {0}")]
    Decode(#[source] FeedError),

    /// A save was rejected; the store is unchanged.
    #[error("store persist failure: {0}")]
    StorePersist(#[source] StoreError),

    /// The store could not be read; the previous snapshot is kept.
    #[error("store read failure: {0}")]
    StoreRead(#[source] StoreError),
}

impl CatalogError {
    /// Short, stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Network(_) => "network",
            CatalogError::Decode(_) => "decode",
            CatalogError::StorePersist(_) => "store_persist",
            CatalogError::StoreRead(_) => "store_read",
        }
    }
}
