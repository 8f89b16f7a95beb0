use std::sync::Arc;

use anyhow::Result;

use crate::{
    error::{check_duration, check_time, ProgressError},
    intervals,
    log_debug, log_error, log_info, log_warn,
    models::{Interval, ProgressSnapshot},
    store::SnapshotStore,
};

use super::{EventOutcome, PlaybackEvent, SessionState, TrackerConfig, TrackerStatus};

const ENABLE_LOGS: bool = true;

/// Turns playback events for one piece of content into watched intervals.
///
/// Segments are only committed at boundaries (pause, seek, or a tick that
/// jumps), so the merge runs once per user action rather than once per tick.
pub struct ProgressTracker {
    content_id: String,
    config: TrackerConfig,
    state: SessionState,
    store: Arc<dyn SnapshotStore>,
}

impl ProgressTracker {
    /// Restore the session for `content_id`, or start empty.
    ///
    /// An unreadable snapshot is logged and replaced by an empty session.
    pub fn open(
        content_id: impl Into<String>,
        store: Arc<dyn SnapshotStore>,
        config: TrackerConfig,
    ) -> Self {
        let content_id = content_id.into();

        let snapshot = match store.load(&content_id) {
            Ok(Some(mut snapshot)) => {
                let dropped = snapshot.sanitize();
                if dropped > 0 {
                    log_warn!(
                        "Dropped {} invalid intervals from saved progress for {}",
                        dropped,
                        content_id
                    );
                }
                snapshot
            }
            Ok(None) => ProgressSnapshot::default(),
            Err(err) => {
                log_warn!(
                    "Ignoring unreadable progress for {}: {:#}",
                    content_id,
                    err
                );
                ProgressSnapshot::default()
            }
        };

        Self {
            content_id,
            config,
            state: SessionState::from_snapshot(snapshot),
            store,
        }
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn apply(&mut self, event: PlaybackEvent) -> Result<EventOutcome, ProgressError> {
        match event {
            PlaybackEvent::Play { time } => self.play(time),
            PlaybackEvent::Pause { time } => self.pause(time),
            PlaybackEvent::Seek { time } => self.seek(time),
            PlaybackEvent::TimeUpdate { time } => self.time_update(time),
            PlaybackEvent::DurationKnown { seconds } => self.set_duration(seconds),
        }
    }

    /// Open a segment at `time`. Repeated plays while tracking are ignored so
    /// the segment keeps its original start.
    pub fn play(&mut self, time: f64) -> Result<EventOutcome, ProgressError> {
        let time = check_time(time)?;

        if !self.state.is_tracking() {
            self.state.open_segment(time);
            log_debug!("{}: segment opened at {:.2}", self.content_id, time);
        }

        Ok(self.outcome(None))
    }

    /// Close the open segment at `time` and stop tracking.
    ///
    /// A pause that lands before the segment start (player jitter) counts as a
    /// too-short segment: nothing is committed.
    pub fn pause(&mut self, time: f64) -> Result<EventOutcome, ProgressError> {
        let time = check_time(time)?;

        let mut committed = None;
        if let Some(start) = self.state.open_segment_start() {
            match Interval::new(start, time) {
                Ok(candidate) => committed = self.commit(candidate),
                Err(err) => log_debug!("{}: dropping segment on pause: {}", self.content_id, err),
            }
            self.state.stop_tracking();
        }

        self.state.last_position = time;
        if committed.is_some() {
            self.persist();
        }

        Ok(self.outcome(committed))
    }

    /// Close the open segment where playback was last seen and reopen it at
    /// `time`. The skipped span is never credited.
    pub fn seek(&mut self, time: f64) -> Result<EventOutcome, ProgressError> {
        let time = check_time(time)?;

        let mut committed = None;
        if let Some(start) = self.state.open_segment_start() {
            // A small backward tick can leave last_seen just before start.
            match Interval::new(start, self.state.cursor.last_seen) {
                Ok(candidate) => committed = self.commit(candidate),
                Err(err) => log_debug!("{}: dropping segment on seek: {}", self.content_id, err),
            }
            self.state.open_segment(time);
        } else {
            self.state.cursor.last_seen = time;
        }

        self.state.last_position = time;
        if committed.is_some() {
            self.persist();
        }

        Ok(self.outcome(committed))
    }

    /// Periodic playhead update. Large jumps are handled as seeks the player
    /// did not report; anything else just advances the cursor.
    pub fn time_update(&mut self, time: f64) -> Result<EventOutcome, ProgressError> {
        let time = check_time(time)?;

        let delta = time - self.state.cursor.last_seen;
        if delta > self.config.forward_jump_secs || delta < -self.config.backward_jump_secs {
            log_debug!(
                "{}: playhead jumped {:+.2}s, treating as seek",
                self.content_id,
                delta
            );
            return self.seek(time);
        }

        self.state.cursor.last_seen = time;
        Ok(self.outcome(None))
    }

    pub fn set_duration(&mut self, seconds: f64) -> Result<EventOutcome, ProgressError> {
        self.state.total_duration = check_duration(seconds)?;
        Ok(self.outcome(None))
    }

    /// Forget everything watched for this content and delete its snapshot.
    pub fn reset(&mut self) {
        self.state.clear();

        if let Err(err) = self.store.remove(&self.content_id) {
            log_error!(
                "Failed to delete saved progress for {}: {:#}",
                self.content_id,
                err
            );
        }

        log_info!("Progress reset for {}", self.content_id);
    }

    /// Save the current snapshot now, regardless of whether anything changed.
    pub fn flush(&self) -> Result<()> {
        self.store.save(&self.content_id, &self.state.snapshot())
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.snapshot()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.state.intervals
    }

    pub fn progress_percentage(&self) -> f64 {
        intervals::progress_percentage(&self.state.intervals, self.state.total_duration)
    }

    pub fn total_watched_seconds(&self) -> f64 {
        intervals::total_watched(&self.state.intervals)
    }

    pub fn unwatched_gaps(&self) -> Vec<Interval> {
        intervals::unwatched_gaps(&self.state.intervals, self.state.total_duration)
    }

    pub fn is_watched(&self, instant: f64) -> bool {
        intervals::is_watched(&self.state.intervals, instant)
    }

    pub fn total_duration(&self) -> f64 {
        self.state.total_duration
    }

    pub fn last_position(&self) -> f64 {
        self.state.last_position
    }

    pub fn status(&self) -> TrackerStatus {
        self.state.status
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_tracking()
    }

    pub fn is_complete(&self) -> bool {
        self.progress_percentage() >= 100.0
    }

    /// Where a player should pick up, if anywhere: strictly inside the media.
    /// With the duration still unknown any positive position qualifies.
    pub fn resume_position(&self) -> Option<f64> {
        let position = self.state.last_position;
        let duration = self.state.total_duration;

        if position <= 0.0 {
            return None;
        }
        if duration > 0.0 && position >= duration {
            return None;
        }
        Some(position)
    }

    fn commit(&mut self, candidate: Interval) -> Option<Interval> {
        if candidate.duration() < self.config.min_segment_secs {
            log_debug!(
                "{}: discarding {:.2}s segment at {:.2}",
                self.content_id,
                candidate.duration(),
                candidate.start
            );
            return None;
        }

        match intervals::add_interval(&self.state.intervals, candidate) {
            Ok(merged) => {
                self.state.intervals = merged;
                log_debug!(
                    "{}: committed [{:.2}, {:.2}], {} intervals",
                    self.content_id,
                    candidate.start,
                    candidate.end,
                    self.state.intervals.len()
                );
                Some(candidate)
            }
            Err(err) => {
                log_warn!("{}: segment rejected: {}", self.content_id, err);
                None
            }
        }
    }

    /// Fire-and-forget: a failed save leaves memory authoritative, and the
    /// next commit writes the whole snapshot again.
    fn persist(&self) {
        if let Err(err) = self.flush() {
            log_error!(
                "Failed to save progress for {}: {:#}",
                self.content_id,
                err
            );
        }
    }

    fn outcome(&self, committed: Option<Interval>) -> EventOutcome {
        EventOutcome {
            committed,
            status: self.state.status,
        }
    }
}
