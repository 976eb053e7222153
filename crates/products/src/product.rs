use serde::{Deserialize, Serialize};

use empower_core::{DomainError, DomainResult, ProductKey};

/// Placeholders used when a product is created from a title alone.
pub const QUICK_ADD_PRODUCT_ID: &str = "123";
pub const QUICK_ADD_DESCRIPTION: &str = "product.description";
pub const QUICK_ADD_DESCRIPTION_FULL: &str = "product.description.full";
pub const PLACEHOLDER_IMAGE: &str = "img";
pub const PLACEHOLDER_IMAGE_CROPPED: &str = "img.cropped";
pub const QUICK_ADD_PRICE: &str = "1";

/// A fully-populated product draft.
///
/// All fields are required; nothing is defaulted or validated except by the
/// `quick` constructor. `product_id` is caller-assigned and may collide with
/// existing rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub description_full: String,
    pub image: String,
    pub image_cropped: String,
    /// Price as text. Never parsed by the catalog.
    pub price: String,
}

impl ProductRecord {
    /// Build a record from a user-entered title, filling placeholder values
    /// for everything else.
    pub fn quick(title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }

        Ok(Self {
            product_id: QUICK_ADD_PRODUCT_ID.to_string(),
            title,
            description: QUICK_ADD_DESCRIPTION.to_string(),
            description_full: QUICK_ADD_DESCRIPTION_FULL.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            image_cropped: PLACEHOLDER_IMAGE_CROPPED.to_string(),
            price: QUICK_ADD_PRICE.to_string(),
        })
    }

    /// Synthetic record number `n`, generated as part of chunk `chunk`.
    pub fn generated(n: usize, chunk: usize) -> Self {
        Self {
            product_id: format!("Product {n}"),
            title: format!("Product {n}"),
            description: format!("Description for product {chunk}"),
            description_full: format!("Full description for product {n}"),
            image: PLACEHOLDER_IMAGE.to_string(),
            image_cropped: PLACEHOLDER_IMAGE_CROPPED.to_string(),
            price: n.to_string(),
        }
    }
}

/// A product row owned by the store, identified by its `ProductKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    key: ProductKey,
    product_id: String,
    title: String,
    description: String,
    description_full: String,
    image: String,
    image_cropped: String,
    price: String,
}

impl Product {
    /// Create a product under a fresh store key.
    pub fn create(record: ProductRecord) -> Self {
        Self::from_record(ProductKey::new(), record)
    }

    /// Rehydrate (or create) a product under an explicit key.
    pub fn from_record(key: ProductKey, record: ProductRecord) -> Self {
        let ProductRecord {
            product_id,
            title,
            description,
            description_full,
            image,
            image_cropped,
            price,
        } = record;

        Self {
            key,
            product_id,
            title,
            description,
            description_full,
            image,
            image_cropped,
            price,
        }
    }

    pub fn key(&self) -> ProductKey {
        self.key
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn description_full(&self) -> &str {
        &self.description_full
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn image_cropped(&self) -> &str {
        &self.image_cropped
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    /// Rename in place. Persisting the change is the caller's job.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Copy the attributes back out (the key is dropped).
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord {
            product_id: self.product_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            description_full: self.description_full.clone(),
            image: self.image.clone(),
            image_cropped: self.image_cropped.clone(),
            price: self.price.clone(),
        }
    }
}
