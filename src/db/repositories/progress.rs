use anyhow::{Context, Result};
use chrono::Utc;
use log::warn;
use rusqlite::{params, Connection, Row};

use crate::db::{
    connection::Database,
    helpers::{encode_intervals, parse_datetime, parse_intervals},
    models::StoredProgress,
};
use crate::models::ProgressSnapshot;

fn row_to_progress(row: &Row) -> Result<StoredProgress> {
    let intervals: String = row.get("intervals")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(StoredProgress {
        content_id: row.get("content_id")?,
        snapshot: ProgressSnapshot {
            intervals: parse_intervals(&intervals, "intervals")?,
            last_position: row.get("last_position")?,
            total_duration: row.get("total_duration")?,
        },
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

fn upsert_row(conn: &Connection, content_id: &str, snapshot: &ProgressSnapshot) -> Result<()> {
    conn.execute(
        "INSERT INTO watch_progress (content_id, intervals, last_position, total_duration, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(content_id) DO UPDATE SET
             intervals = excluded.intervals,
             last_position = excluded.last_position,
             total_duration = excluded.total_duration,
             updated_at = excluded.updated_at",
        params![
            content_id,
            encode_intervals(&snapshot.intervals)?,
            snapshot.last_position,
            snapshot.total_duration,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to save progress for {content_id}"))?;
    Ok(())
}

fn delete_row(conn: &Connection, content_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM watch_progress WHERE content_id = ?1",
        params![content_id],
    )
    .with_context(|| format!("failed to delete progress for {content_id}"))?;
    Ok(())
}

impl Database {
    pub fn get_progress(&self, content_id: &str) -> Result<Option<StoredProgress>> {
        let content_id = content_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT content_id, intervals, last_position, total_duration, updated_at
                 FROM watch_progress
                 WHERE content_id = ?1",
            )?;

            let mut rows = stmt.query(params![content_id])?;
            let progress = match rows.next()? {
                Some(row) => Some(row_to_progress(row)?),
                None => None,
            };
            Ok(progress)
        })
    }

    /// Every stored snapshot, most recently updated first. Rows that fail to
    /// decode are logged and left out.
    pub fn list_progress(&self) -> Result<Vec<StoredProgress>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT content_id, intervals, last_position, total_duration, updated_at
                 FROM watch_progress
                 ORDER BY updated_at DESC, content_id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_progress(row) {
                    Ok(entry) => entries.push(entry),
                    Err(err) => {
                        let content_id: Option<String> = row.get("content_id").ok();
                        warn!(
                            "Skipping unreadable progress row {}: {:#}",
                            content_id.as_deref().unwrap_or("<unknown>"),
                            err
                        );
                    }
                }
            }

            Ok(entries)
        })
    }

    /// Returns as soon as the write is queued. Failures are logged by the worker.
    pub fn queue_upsert_progress(&self, content_id: &str, snapshot: &ProgressSnapshot) -> Result<()> {
        let content_id = content_id.to_string();
        let snapshot = snapshot.clone();
        self.submit("progress save", move |conn| {
            upsert_row(conn, &content_id, &snapshot)
        })
    }

    pub fn queue_delete_progress(&self, content_id: &str) -> Result<()> {
        let content_id = content_id.to_string();
        self.submit("progress delete", move |conn| delete_row(conn, &content_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;
    use tempfile::TempDir;

    fn open_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("progress.sqlite3")).unwrap();
        (db, dir)
    }

    fn sample() -> ProgressSnapshot {
        ProgressSnapshot {
            intervals: vec![
                Interval { start: 0.0, end: 1.0 },
                Interval { start: 50.0, end: 52.123456789 },
            ],
            last_position: 52.123456789,
            total_duration: 100.0,
        }
    }

    fn insert_raw_row(db: &Database, content_id: &'static str, intervals: &'static str) {
        db.execute(move |conn| {
            conn.execute(
                "INSERT INTO watch_progress (content_id, intervals, last_position, total_duration, updated_at)
                 VALUES (?1, ?2, 0, 0, '2024-01-01T00:00:00Z')",
                params![content_id, intervals],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn saved_progress_reads_back_unchanged() {
        let (db, _dir) = open_db();
        db.queue_upsert_progress("lecture-1", &sample()).unwrap();

        let stored = db.get_progress("lecture-1").unwrap().unwrap();
        assert_eq!(stored.content_id, "lecture-1");
        assert_eq!(stored.snapshot, sample());
    }

    #[test]
    fn upsert_overwrites_previous_snapshot() {
        let (db, _dir) = open_db();
        db.queue_upsert_progress("lecture-1", &sample()).unwrap();

        let newer = ProgressSnapshot {
            intervals: vec![Interval { start: 0.0, end: 80.0 }],
            last_position: 80.0,
            total_duration: 100.0,
        };
        db.queue_upsert_progress("lecture-1", &newer).unwrap();

        assert_eq!(db.get_progress("lecture-1").unwrap().unwrap().snapshot, newer);
        assert_eq!(db.list_progress().unwrap().len(), 1);
    }

    #[test]
    fn queued_delete_removes_the_row() {
        let (db, _dir) = open_db();
        db.queue_upsert_progress("lecture-2", &sample()).unwrap();
        assert!(db.get_progress("lecture-2").unwrap().is_some());

        db.queue_delete_progress("lecture-2").unwrap();
        assert!(db.get_progress("lecture-2").unwrap().is_none());
    }

    #[test]
    fn missing_content_reads_as_none() {
        let (db, _dir) = open_db();
        db.queue_delete_progress("nope").unwrap();
        assert!(db.get_progress("nope").unwrap().is_none());
    }

    #[test]
    fn corrupt_interval_column_is_an_error() {
        let (db, _dir) = open_db();
        insert_raw_row(&db, "broken", "not json");

        assert!(db.get_progress("broken").is_err());
    }

    #[test]
    fn list_skips_corrupt_rows() {
        let (db, _dir) = open_db();
        insert_raw_row(&db, "broken", "not json");
        db.queue_upsert_progress("lecture-3", &sample()).unwrap();

        let entries = db.list_progress().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_id, "lecture-3");
        assert_eq!(entries[0].snapshot, sample());
    }
}
