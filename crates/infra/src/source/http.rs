//! HTTP feed client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::r#trait::{CatalogSource, SourceError};

/// Public demo feed.
pub const DEFAULT_FEED_URL: &str =
    "https://application-monitoring-flask-dot-sales-engineering-sf.appspot.com/products-join";

/// Fetches the feed with a single unauthenticated GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self::with_client(client, url))
    }

    /// Reuse an existing client (connection pool, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn label(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        let started = Instant::now();

        let resp = self
            .client
            .get(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status(status.as_u16(), body));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        tracing::debug!(
            endpoint = %self.url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "fetched product feed"
        );

        Ok(body.to_vec())
    }
}
