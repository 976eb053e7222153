//! Catalog synchronization: remote feed → local store → in-memory snapshot.
//!
//! ## Sequencing
//!
//! Every store access and every snapshot change happens while holding one
//! async mutex (the sequencing context). The remote fetch and feed decoding
//! run outside it and only take the lock once there is something to write.
//! Within `sync_from_remote`, all inserts are staged in one `ChangeSet` and
//! saved atomically, and the snapshot reload runs only after the save
//! returned.
//!
//! There is no ordering between separate public operations: a sync racing a
//! `delete_all` is resolved by whichever takes the lock first.
//!
//! ## Population policy
//!
//! The store is populated from the feed at most once: a sync is a no-op when
//! the snapshot already holds products, *or* when the store holds rows that
//! have not been loaded yet (those are loaded instead).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::instrument;

use empower_core::ProductKey;
use empower_events::{CatalogChanged, ChangeReason, EventBus, InMemoryEventBus, Subscription};
use empower_infra::{CatalogSource, ChangeSet, ProductStore};
use empower_products::{Product, ProductRecord, decode_feed};

use crate::catalog::{Catalog, CatalogState};
use crate::error::CatalogError;

/// Items generated when `bulk_generate` is asked for zero.
pub const DEFAULT_BULK_COUNT: usize = 100_000;
/// Chunk size used when `bulk_generate` is asked for a zero batch size.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;
/// Pause between generated chunks.
pub const DEFAULT_BULK_PAUSE: Duration = Duration::from_millis(100);

/// Why a sync wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// The in-memory catalog already holds products.
    CatalogLoaded,
    /// The store holds rows from an earlier session; they were loaded instead.
    StoreAlreadyPopulated { rows: usize },
    /// The feed decoded to an empty list.
    EmptyFeed,
}

/// Result of `sync_from_remote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SyncOutcome {
    Populated { inserted: usize },
    Skipped(SkipReason),
}

/// Summary of a `bulk_generate` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub requested: usize,
    pub batch_size: usize,
    pub chunks: usize,
    pub persisted: usize,
    /// Indexes of chunks whose save failed.
    pub failed_chunks: Vec<usize>,
}

struct CatalogInner {
    catalog: Catalog,
    state: CatalogState,
}

/// Reconciles a remote product feed with a local store and serves the
/// current catalog.
pub struct CatalogSyncService<S, R> {
    store: S,
    source: R,
    inner: Mutex<CatalogInner>,
    bus: InMemoryEventBus<CatalogChanged>,
    revision: AtomicU64,
    bulk_pause: Duration,
}

impl<S, R> CatalogSyncService<S, R>
where
    S: ProductStore,
    R: CatalogSource,
{
    pub fn new(store: S, source: R) -> Self {
        Self {
            store,
            source,
            inner: Mutex::new(CatalogInner {
                catalog: Catalog::empty(),
                state: CatalogState::Empty,
            }),
            bus: InMemoryEventBus::new(),
            revision: AtomicU64::new(0),
            bulk_pause: DEFAULT_BULK_PAUSE,
        }
    }

    /// Override the pause `bulk_generate` takes between chunks.
    pub fn with_bulk_pause(mut self, pause: Duration) -> Self {
        self.bulk_pause = pause;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Register for "catalog changed" signals. The registration ends when
    /// the returned subscription is dropped.
    pub fn subscribe(&self) -> Subscription<CatalogChanged> {
        self.bus.subscribe()
    }

    /// Current snapshot.
    pub async fn catalog(&self) -> Catalog {
        self.inner.lock().await.catalog.clone()
    }

    pub async fn state(&self) -> CatalogState {
        self.inner.lock().await.state
    }

    /// Populate an empty store from the remote feed, then load it.
    #[instrument(skip(self), fields(source = %self.source.label()), err)]
    pub async fn sync_from_remote(&self) -> Result<SyncOutcome, CatalogError> {
        let payload = self.source.fetch().await.map_err(CatalogError::Network)?;
        let records = decode_feed(&payload).map_err(CatalogError::Decode)?;

        let mut inner = self.inner.lock().await;

        if !inner.catalog.is_empty() {
            tracing::debug!(loaded = inner.catalog.len(), "catalog already loaded; skipping sync");
            return Ok(SyncOutcome::Skipped(SkipReason::CatalogLoaded));
        }

        let rows = self.store.count().await.map_err(CatalogError::StoreRead)?;
        if rows > 0 {
            tracing::info!(rows, "store already populated; loading instead of inserting");
            self.refresh(&mut inner).await?;
            self.notify(ChangeReason::Reloaded);
            return Ok(SyncOutcome::Skipped(SkipReason::StoreAlreadyPopulated { rows }));
        }

        if records.is_empty() {
            tracing::info!("feed is empty; nothing to insert");
            return Ok(SyncOutcome::Skipped(SkipReason::EmptyFeed));
        }

        inner.state = CatalogState::Populating;

        let inserted = records.len();
        let changes: ChangeSet = records
            .into_iter()
            .map(|record| Product::create(record.into()))
            .collect();

        if let Err(err) = self.store.save(changes).await {
            inner.state = CatalogState::Empty;
            return Err(CatalogError::StorePersist(err));
        }

        let refreshed = self.refresh(&mut inner).await;
        self.notify(ChangeReason::Synced);
        refreshed?;

        tracing::info!(inserted, "catalog populated from remote feed");
        Ok(SyncOutcome::Populated { inserted })
    }

    /// Replace the snapshot with the store's current rows.
    ///
    /// Returns the number of products loaded. On failure the previous
    /// snapshot is kept.
    pub async fn load_from_store(&self) -> Result<usize, CatalogError> {
        let mut inner = self.inner.lock().await;
        let loaded = self.refresh(&mut inner).await?;
        self.notify(ChangeReason::Reloaded);
        Ok(loaded)
    }

    /// Persist one new product.
    pub async fn add_product(&self, record: ProductRecord) -> Result<Product, CatalogError> {
        let product = Product::create(record);

        let mut changes = ChangeSet::new();
        changes.insert(product.clone());

        let mut inner = self.inner.lock().await;
        self.commit(&mut inner, changes).await?;

        tracing::debug!(key = %product.key(), title = product.title(), "product added");
        Ok(product)
    }

    /// Persist in-place edits (e.g. a new title) of an existing product.
    pub async fn update_product(&self, product: Product) -> Result<(), CatalogError> {
        let mut changes = ChangeSet::new();
        changes.update(product);

        let mut inner = self.inner.lock().await;
        self.commit(&mut inner, changes).await
    }

    pub async fn delete_product(&self, key: ProductKey) -> Result<(), CatalogError> {
        let mut changes = ChangeSet::new();
        changes.delete(key);

        let mut inner = self.inner.lock().await;
        self.commit(&mut inner, changes).await
    }

    /// Delete every product in the *current snapshot*.
    ///
    /// The store is not re-queried: rows written since the last load survive.
    /// Returns the number of products deleted.
    pub async fn delete_all(&self) -> Result<usize, CatalogError> {
        let mut inner = self.inner.lock().await;

        let mut changes = ChangeSet::new();
        for product in inner.catalog.iter() {
            changes.delete(product.key());
        }

        let deleted = changes.len();
        if deleted == 0 {
            return Ok(0);
        }

        self.commit(&mut inner, changes).await?;
        tracing::info!(deleted, "catalog cleared");
        Ok(deleted)
    }

    /// Remove every row from the store, loaded or not.
    pub async fn wipe_store(&self) -> Result<u64, CatalogError> {
        let mut inner = self.inner.lock().await;

        let removed = self.store.clear().await.map_err(CatalogError::StorePersist)?;

        let refreshed = self.refresh(&mut inner).await;
        self.notify(ChangeReason::Written);
        refreshed?;

        tracing::info!(removed, "store wiped");
        Ok(removed)
    }

    /// Synthetic load generator.
    ///
    /// Writes `count` products in chunks of `batch_size` (zero selects the
    /// defaults). Each chunk is built and saved under the sequencing lock,
    /// followed by a refresh and one change signal; the lock is released and
    /// the configured pause taken before the next chunk. A failed chunk is
    /// logged and skipped.
    #[instrument(skip(self))]
    pub async fn bulk_generate(&self, count: usize, batch_size: usize) -> BulkReport {
        let count = if count == 0 { DEFAULT_BULK_COUNT } else { count };
        let batch_size = if batch_size == 0 { DEFAULT_BATCH_SIZE } else { batch_size };
        let chunks = count.div_ceil(batch_size);

        let mut report = BulkReport {
            requested: count,
            batch_size,
            chunks,
            persisted: 0,
            failed_chunks: Vec::new(),
        };

        for chunk in 0..chunks {
            let start = chunk * batch_size;
            let end = (start + batch_size).min(count);

            {
                let mut inner = self.inner.lock().await;

                let changes: ChangeSet = (start..end)
                    .map(|n| Product::create(ProductRecord::generated(n, chunk)))
                    .collect();

                match self.commit(&mut inner, changes).await {
                    Ok(()) => report.persisted += end - start,
                    // Saved, but the snapshot is stale until the next load.
                    Err(err @ CatalogError::StoreRead(_)) => {
                        report.persisted += end - start;
                        tracing::warn!(chunk, error = %err, "generated chunk saved but reload failed");
                    }
                    Err(err) => {
                        report.failed_chunks.push(chunk);
                        tracing::warn!(chunk, error = %err, "failed to save generated chunk");
                    }
                }
            }

            if chunk + 1 < chunks && !self.bulk_pause.is_zero() {
                tokio::time::sleep(self.bulk_pause).await;
            }
        }

        tracing::info!(
            persisted = report.persisted,
            failed_chunks = report.failed_chunks.len(),
            "bulk generation finished"
        );
        report
    }

    /// Save, reload, signal. A read failure after a successful save is
    /// reported as `StoreRead`; the signal is still sent because the store
    /// did change.
    async fn commit(&self, inner: &mut CatalogInner, changes: ChangeSet) -> Result<(), CatalogError> {
        self.store.save(changes).await.map_err(CatalogError::StorePersist)?;

        let refreshed = self.refresh(inner).await;
        self.notify(ChangeReason::Written);
        refreshed.map(|_| ())
    }

    async fn refresh(&self, inner: &mut CatalogInner) -> Result<usize, CatalogError> {
        match self.store.fetch_all().await {
            Ok(products) => {
                inner.catalog = Catalog::new(products);
                inner.state = CatalogState::for_len(inner.catalog.len());
                Ok(inner.catalog.len())
            }
            Err(err) => {
                inner.state = CatalogState::for_len(inner.catalog.len());
                Err(CatalogError::StoreRead(err))
            }
        }
    }

    fn notify(&self, reason: ChangeReason) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(err) = self.bus.publish(CatalogChanged::new(revision, reason)) {
            tracing::warn!(?err, revision, "failed to publish catalog change");
        }
    }
}
