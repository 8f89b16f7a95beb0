use thiserror::Error;

/// Rejections raised before anything reaches the interval set.
///
/// A rejected event leaves the tracker exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("invalid playback time {time}")]
    InvalidTime { time: f64 },

    #[error("invalid media duration {seconds}")]
    InvalidDuration { seconds: f64 },

    #[error("invalid interval [{start}, {end}]")]
    InvalidInterval { start: f64, end: f64 },
}

/// Playback positions must be finite and non-negative.
pub fn check_time(time: f64) -> Result<f64, ProgressError> {
    if time.is_finite() && time >= 0.0 {
        Ok(time)
    } else {
        Err(ProgressError::InvalidTime { time })
    }
}

pub fn check_duration(seconds: f64) -> Result<f64, ProgressError> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(ProgressError::InvalidDuration { seconds })
    }
}
