use crate::models::{Interval, ProgressSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Idle,
    Tracking,
}

impl Default for TrackerStatus {
    fn default() -> Self {
        TrackerStatus::Idle
    }
}

/// Where the open segment began and where playback was last seen.
///
/// Never persisted: a reload always starts Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackingCursor {
    pub segment_start: Option<f64>,
    pub last_seen: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Always kept merged.
    pub intervals: Vec<Interval>,
    pub last_position: f64,
    pub total_duration: f64,
    pub status: TrackerStatus,
    pub cursor: TrackingCursor,
}

impl SessionState {
    pub fn from_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self {
            intervals: snapshot.intervals,
            last_position: snapshot.last_position,
            total_duration: snapshot.total_duration,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            intervals: self.intervals.clone(),
            last_position: self.last_position,
            total_duration: self.total_duration,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.status == TrackerStatus::Tracking
    }

    /// Start of the open segment, if one is open.
    pub fn open_segment_start(&self) -> Option<f64> {
        match self.status {
            TrackerStatus::Tracking => self.cursor.segment_start,
            TrackerStatus::Idle => None,
        }
    }

    pub fn open_segment(&mut self, at: f64) {
        self.status = TrackerStatus::Tracking;
        self.cursor = TrackingCursor {
            segment_start: Some(at),
            last_seen: at,
        };
    }

    pub fn stop_tracking(&mut self) {
        self.status = TrackerStatus::Idle;
        self.cursor.segment_start = None;
    }

    /// Forget everything watched. The media duration survives: it describes
    /// the content, not the viewing.
    pub fn clear(&mut self) {
        *self = Self {
            total_duration: self.total_duration,
            ..Self::default()
        };
    }
}
