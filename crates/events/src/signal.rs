//! The catalog change signal.

use serde::{Deserialize, Serialize};

/// Why the catalog snapshot changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeReason {
    /// The snapshot was re-read from the store with no preceding write.
    Reloaded,
    /// The store was populated from the remote feed.
    Synced,
    /// A local write (add, update, delete, wipe, generated chunk) was saved.
    Written,
}

/// "Catalog changed" notification.
///
/// Carries no catalog data: consumers re-query the snapshot. `revision` grows
/// by one per signal from the same publisher, so a consumer that coalesces
/// signals can tell how many it skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogChanged {
    pub revision: u64,
    pub reason: ChangeReason,
}

impl CatalogChanged {
    pub fn new(revision: u64, reason: ChangeReason) -> Self {
        Self { revision, reason }
    }
}
