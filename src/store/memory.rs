use std::{collections::HashMap, sync::Mutex};

use anyhow::{anyhow, Context, Result};

use super::SnapshotStore;
use crate::models::ProgressSnapshot;

/// Snapshots kept as serialized JSON strings in a map, the same shape a
/// browser's key/value storage would hold them in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload without validating it.
    pub fn insert_raw(&self, content_id: &str, payload: impl Into<String>) -> Result<()> {
        self.lock()?.insert(content_id.to_string(), payload.into());
        Ok(())
    }

    pub fn raw(&self, content_id: &str) -> Option<String> {
        self.lock().ok()?.get(content_id).cloned()
    }

    pub fn contains(&self, content_id: &str) -> bool {
        self.raw(content_id).is_some()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, content_id: &str) -> Result<Option<ProgressSnapshot>> {
        let payload = match self.lock()?.get(content_id) {
            Some(payload) => payload.clone(),
            None => return Ok(None),
        };

        let snapshot = serde_json::from_str(&payload)
            .with_context(|| format!("malformed snapshot for {content_id}"))?;
        Ok(Some(snapshot))
    }

    fn save(&self, content_id: &str, snapshot: &ProgressSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot).context("failed to encode snapshot")?;
        self.lock()?.insert(content_id.to_string(), payload);
        Ok(())
    }

    fn remove(&self, content_id: &str) -> Result<()> {
        self.lock()?.remove(content_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;

    #[test]
    fn round_trips_snapshots() {
        let store = MemoryStore::new();
        let snapshot = ProgressSnapshot {
            intervals: vec![Interval { start: 0.1, end: 0.7 }],
            last_position: 1.0 / 3.0,
            total_duration: 12.75,
        };

        store.save("a", &snapshot).unwrap();
        assert_eq!(store.load("a").unwrap(), Some(snapshot));
        assert_eq!(store.load("b").unwrap(), None);
    }

    #[test]
    fn garbage_payload_is_an_error() {
        let store = MemoryStore::new();
        store.insert_raw("a", "{not json").unwrap();
        assert!(store.load("a").is_err());

        store
            .insert_raw("b", r#"{"intervals": [], "lastPosition": 3}"#)
            .unwrap();
        assert!(store.load("b").is_err());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::new();
        store.save("a", &ProgressSnapshot::default()).unwrap();
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(!store.contains("a"));
    }
}
