use chrono::{DateTime, Utc};

use crate::models::ProgressSnapshot;

/// One row of `watch_progress`.
#[derive(Debug, Clone)]
pub struct StoredProgress {
    pub content_id: String,
    pub snapshot: ProgressSnapshot,
    pub updated_at: DateTime<Utc>,
}
