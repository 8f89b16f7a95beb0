use serde::{Deserialize, Serialize};

use super::Interval;
use crate::intervals::merge;

/// The persisted view of one viewer's progress through one piece of media.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub intervals: Vec<Interval>,
    pub last_position: f64,
    pub total_duration: f64,
}

impl ProgressSnapshot {
    /// Drop anything that cannot be trusted and restore the merged-set invariant.
    ///
    /// Returns the number of intervals that were discarded as invalid.
    pub fn sanitize(&mut self) -> usize {
        let before = self.intervals.len();
        self.intervals.retain(Interval::is_valid);
        let dropped = before - self.intervals.len();
        self.intervals = merge(&self.intervals);

        if !self.last_position.is_finite() || self.last_position < 0.0 {
            self.last_position = 0.0;
        }
        if !self.total_duration.is_finite() || self.total_duration < 0.0 {
            self.total_duration = 0.0;
        }

        dropped
    }
}
