use serde::{Deserialize, Serialize};

use crate::error::{check_time, ProgressError};

/// A contiguous span of playback, in seconds, confirmed as watched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Result<Self, ProgressError> {
        let interval = Self { start, end };
        interval.validate()?;
        Ok(interval)
    }

    /// Both bounds finite and non-negative, `end >= start`.
    pub fn validate(&self) -> Result<(), ProgressError> {
        let invalid = ProgressError::InvalidInterval {
            start: self.start,
            end: self.end,
        };
        check_time(self.start).map_err(|_| invalid.clone())?;
        check_time(self.end).map_err(|_| invalid.clone())?;
        if self.end < self.start {
            return Err(invalid);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open membership: the end instant is not part of the span.
    pub fn contains(&self, instant: f64) -> bool {
        instant >= self.start && instant < self.end
    }
}
