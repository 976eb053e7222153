//! In-memory catalog snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use empower_products::Product;

/// Lifecycle of the catalog within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogState {
    Empty,
    /// A remote sync is writing the first batch of products.
    Populating,
    Populated,
}

impl CatalogState {
    pub(crate) fn for_len(len: usize) -> Self {
        if len == 0 {
            CatalogState::Empty
        } else {
            CatalogState::Populated
        }
    }
}

/// Immutable, cheaply clonable view of the store's rows at the last load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Row labels, in store order.
    pub fn titles(&self) -> Vec<String> {
        self.products.iter().map(|p| p.title().to_string()).collect()
    }

    /// Section header shown above the list, e.g. `"12 items"`.
    pub fn header_title(&self) -> String {
        format!("{} items", self.len())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
