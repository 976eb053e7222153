//! `empower-client`
//!
//! **Responsibility:** keep the on-device product store in sync with the
//! remote feed and present the current catalog.
//!
//! This crate provides:
//! - `CatalogSyncService`: fetch-if-empty-then-load, local writes, bulk
//!   generation, change signals
//! - `Session`: the per-user context that owns a cart and decides what to do
//!   with catalog errors
//! - `ClientConfig`: environment-driven configuration for the binary

pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod sync;

pub use catalog::{Catalog, CatalogState};
pub use config::{ClientConfig, RejectedSetting};
pub use error::CatalogError;
pub use session::Session;
pub use sync::{
    BulkReport, CatalogSyncService, DEFAULT_BATCH_SIZE, DEFAULT_BULK_COUNT, DEFAULT_BULK_PAUSE,
    SkipReason, SyncOutcome,
};
