//! Products domain module.
//!
//! Business rules for catalog products and the remote feed's wire format,
//! implemented as deterministic domain logic (no IO, no HTTP, no storage).

pub mod feed;
pub mod product;

pub use feed::{FeedError, FeedRecord, decode_feed};
pub use product::{Product, ProductRecord};
