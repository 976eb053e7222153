use std::sync::RwLock;

use async_trait::async_trait;

use empower_products::Product;

use super::r#trait::{ChangeSet, ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `products` (as if saved by an earlier session).
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            rows: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.clone())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.len())
    }

    async fn save(&self, changes: ChangeSet) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;

        // Apply to a scratch copy so a failed update leaves the store untouched.
        let mut next = rows.clone();
        next.extend(changes.inserts().iter().cloned());

        for updated in changes.updates() {
            let slot = next
                .iter_mut()
                .find(|p| p.key() == updated.key())
                .ok_or(StoreError::Missing(updated.key()))?;
            *slot = updated.clone();
        }

        if !changes.deletes().is_empty() {
            next.retain(|p| !changes.deletes().contains(&p.key()));
        }

        *rows = next;
        Ok(())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use empower_core::ProductKey;
    use empower_products::ProductRecord;

    fn product(title: &str) -> Product {
        Product::create(ProductRecord::quick(title).unwrap())
    }

    #[tokio::test]
    async fn save_inserts_in_order() {
        let store = InMemoryProductStore::new();
        let changes: ChangeSet = vec![product("a"), product("b"), product("c")].into_iter().collect();

        store.save(changes).await.unwrap();

        let titles: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.title().to_string())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_apply_by_key() {
        let mut a = product("a");
        let b = product("b");
        let store = InMemoryProductStore::with_products(vec![a.clone(), b.clone()]);

        a.set_title("a2");
        let mut changes = ChangeSet::new();
        changes.update(a.clone()).delete(b.key()).delete(ProductKey::new());
        store.save(changes).await.unwrap();

        assert_eq!(store.fetch_all().await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn failed_update_leaves_store_unchanged() {
        let existing = product("a");
        let store = InMemoryProductStore::with_products(vec![existing.clone()]);

        let mut changes = ChangeSet::new();
        changes.insert(product("b")).update(product("ghost"));

        match store.save(changes).await {
            Err(StoreError::Missing(_)) => {}
            other => panic!("expected Missing, got {other:?}"),
        }
        assert_eq!(store.fetch_all().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn clear_reports_removed_rows() {
        let store = InMemoryProductStore::with_products(vec![product("a"), product("b")]);

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.clear().await.unwrap(), 0);
    }
}
