use anyhow::Result;

use super::SnapshotStore;
use crate::db::Database;
use crate::models::ProgressSnapshot;

/// [`SnapshotStore`] over the SQLite worker.
///
/// Loads wait for the worker. Saves and removes are queued and return
/// immediately, so a playback event never waits on disk; failures inside the
/// worker are logged there.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self, content_id: &str) -> Result<Option<ProgressSnapshot>> {
        Ok(self
            .db
            .get_progress(content_id)?
            .map(|stored| stored.snapshot))
    }

    fn save(&self, content_id: &str, snapshot: &ProgressSnapshot) -> Result<()> {
        self.db.queue_upsert_progress(content_id, snapshot)
    }

    fn remove(&self, content_id: &str) -> Result<()> {
        self.db.queue_delete_progress(content_id)
    }
}
