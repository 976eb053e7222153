//! Catalog change signalling.
//!
//! A small pub/sub layer used by the catalog service to tell presentation
//! layers that the catalog snapshot changed. Each bus is owned by the
//! component that publishes on it; there is no process-wide broadcast.

pub mod bus;
pub mod in_memory_bus;
pub mod signal;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use signal::{CatalogChanged, ChangeReason};
