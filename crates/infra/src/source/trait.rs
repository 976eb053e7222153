use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching the feed.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("feed endpoint returned {0}: {1}")]
    Status(u16, String),
}

/// Provides the raw product feed.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable label identifying this source (used in logs).
    fn label(&self) -> &str;

    /// Fetch the complete feed payload.
    async fn fetch(&self) -> Result<Vec<u8>, SourceError>;
}

#[async_trait]
impl<S> CatalogSource for Arc<S>
where
    S: CatalogSource + ?Sized,
{
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        (**self).fetch().await
    }
}
