//! Product persistence boundary.
//!
//! `ProductStore` is the only way the catalog touches durable state. Two
//! implementations ship: an in-memory store for tests/dev and a SQLite store
//! for the real client.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use sqlite::{SqliteProductStore, default_database_path, default_database_url};
pub use r#trait::{ChangeSet, ProductStore, StoreError};
