//! Where snapshots live between sessions.
//!
//! The tracker only needs get/set/delete by content identifier; everything
//! about the storage medium stays behind [`SnapshotStore`].

pub mod memory;
pub mod sqlite;

use anyhow::Result;

use crate::models::ProgressSnapshot;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved for `content_id` yet. A stored
    /// payload that cannot be decoded is an `Err`.
    fn load(&self, content_id: &str) -> Result<Option<ProgressSnapshot>>;

    /// Create or overwrite the snapshot for `content_id`.
    fn save(&self, content_id: &str, snapshot: &ProgressSnapshot) -> Result<()>;

    /// Delete the snapshot. Removing something that does not exist succeeds.
    fn remove(&self, content_id: &str) -> Result<()>;
}
