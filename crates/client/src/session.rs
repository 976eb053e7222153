//! Per-user client context.
//!
//! A `Session` is what a screen talks to. It owns the cart, shares the catalog
//! service, and is the place where catalog errors stop: every failure is
//! logged and swallowed, so the visible effect of a failed operation is that
//! the catalog simply does not change.

use std::sync::Arc;

use empower_cart::Cart;
use empower_core::SessionId;
use empower_events::{CatalogChanged, Subscription};
use empower_infra::{CatalogSource, ProductStore};
use empower_products::{Product, ProductRecord};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::sync::{BulkReport, CatalogSyncService, SyncOutcome};

pub struct Session<S, R> {
    id: SessionId,
    catalog: Arc<CatalogSyncService<S, R>>,
    cart: Cart,
    changes: Subscription<CatalogChanged>,
}

impl<S, R> Session<S, R>
where
    S: ProductStore,
    R: CatalogSource,
{
    pub fn new(catalog: Arc<CatalogSyncService<S, R>>) -> Self {
        let id = SessionId::new();
        let changes = catalog.subscribe();

        Self {
            id,
            catalog,
            cart: Cart::new(id),
            changes,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Show whatever the store already has, then try to populate it from the
    /// feed. Loading first means a sync never races a stale, empty snapshot.
    pub async fn start(&mut self) -> Option<SyncOutcome> {
        tracing::info!(session = %self.id, "session starting");

        let loaded = self.catalog.load_from_store().await;
        self.report("load_from_store", loaded);

        let synced = self.catalog.sync_from_remote().await;
        self.report("sync_from_remote", synced)
    }

    /// Re-read the store.
    pub async fn refresh(&mut self) -> Option<usize> {
        let loaded = self.catalog.load_from_store().await;
        self.report("load_from_store", loaded)
    }

    /// Quick add: a product with `title` and placeholder values for every
    /// other field. A blank title is rejected before anything is written.
    pub async fn add_titled(&mut self, title: &str) -> Option<Product> {
        let record = match ProductRecord::quick(title) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "quick add rejected");
                return None;
            }
        };

        let added = self.catalog.add_product(record).await;
        self.report("add_product", added)
    }

    /// Rename a product already in the catalog.
    pub async fn rename(&mut self, index: usize, title: &str) -> Option<()> {
        let mut product = self.catalog.catalog().await.get(index)?.clone();
        product.set_title(title);

        let updated = self.catalog.update_product(product).await;
        self.report("update_product", updated)
    }

    /// Delete everything currently shown.
    pub async fn clear(&mut self) -> Option<usize> {
        let deleted = self.catalog.delete_all().await;
        self.report("delete_all", deleted)
    }

    /// Empty the store, including rows that were never loaded.
    pub async fn wipe(&mut self) -> Option<u64> {
        let removed = self.catalog.wipe_store().await;
        self.report("wipe_store", removed)
    }

    pub async fn generate(&mut self, count: usize, batch_size: usize) -> BulkReport {
        self.catalog.bulk_generate(count, batch_size).await
    }

    /// Put the product shown at `index` into the cart. Returns the line's new
    /// quantity, or `None` when the index is out of range.
    pub async fn select(&mut self, index: usize) -> Option<u32> {
        let catalog = self.catalog.catalog().await;
        let product = catalog.get(index)?;

        let quantity = self.cart.add_product(product);
        tracing::debug!(session = %self.id, key = %product.key(), quantity, "added to cart");
        Some(quantity)
    }

    pub async fn snapshot(&self) -> Catalog {
        self.catalog.catalog().await
    }

    pub async fn header_title(&self) -> String {
        self.snapshot().await.header_title()
    }

    pub async fn titles(&self) -> Vec<String> {
        self.snapshot().await.titles()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Signals received since the last call.
    pub fn take_changes(&self) -> Vec<CatalogChanged> {
        self.changes.drain()
    }

    fn report<T>(&self, op: &'static str, result: Result<T, CatalogError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    session = %self.id,
                    op,
                    kind = err.kind(),
                    error = %err,
                    "catalog operation failed"
                );
                None
            }
        }
    }
}
