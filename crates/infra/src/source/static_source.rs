use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::r#trait::{CatalogSource, SourceError};

/// Fixed-response source for tests/dev.
#[derive(Debug)]
pub struct StaticCatalogSource {
    response: Result<Vec<u8>, SourceError>,
    fetches: AtomicUsize,
}

impl StaticCatalogSource {
    /// Always answers with `payload`.
    pub fn payload(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            response: Ok(payload.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Always fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            response: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// How many times `fetch` was called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn label(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
