use async_trait::async_trait;
use thiserror::Error;

use empower_core::ProductKey;
use empower_products::Product;
use std::sync::Arc;

/// A batch of changes applied by one `ProductStore::save`.
///
/// Changes are staged in memory and only reach the store when the set is
/// saved, at which point they apply atomically in the order inserts →
/// updates → deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    inserts: Vec<Product>,
    updates: Vec<Product>,
    deletes: Vec<ProductKey>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: Product) -> &mut Self {
        self.inserts.push(product);
        self
    }

    pub fn update(&mut self, product: Product) -> &mut Self {
        self.updates.push(product);
        self
    }

    pub fn delete(&mut self, key: ProductKey) -> &mut Self {
        self.deletes.push(key);
        self
    }

    pub fn inserts(&self) -> &[Product] {
        &self.inserts
    }

    pub fn updates(&self) -> &[Product] {
        &self.updates
    }

    pub fn deletes(&self) -> &[ProductKey] {
        &self.deletes
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of staged operations.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }
}

impl FromIterator<Product> for ChangeSet {
    /// A set that inserts every product.
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            inserts: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Product store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database could not be opened or reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query or transaction failed.
    #[error("store query failed: {0}")]
    Query(String),

    /// An update targeted a row that does not exist.
    #[error("product not found in store: {0}")]
    Missing(ProductKey),

    /// A stored row could not be turned back into a `Product`.
    #[error("corrupt product row: {0}")]
    Corrupt(String),

    /// In-process lock poisoned.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Durable product storage.
///
/// ## Semantics
///
/// - `fetch_all()` returns every row in insertion order
/// - `save()` is all-or-nothing; a failed save leaves the store unchanged
/// - deleting a key that is not present is a no-op
/// - updating a key that is not present fails with `StoreError::Missing`
/// - `product_id` uniqueness is **not** enforced
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    async fn save(&self, changes: ChangeSet) -> Result<(), StoreError>;

    /// Remove every row. Returns the number of rows removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).fetch_all().await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        (**self).count().await
    }

    async fn save(&self, changes: ChangeSet) -> Result<(), StoreError> {
        (**self).save(changes).await
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        (**self).clear().await
    }
}
