use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Thresholds separating real watching from control noise and skips.
///
/// The defaults are heuristics, not derived values; they are exposed so a
/// player with a different tick rate can tune them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Segments shorter than this are dropped (rapid play/pause, double clicks).
    pub min_segment_secs: f64,

    /// A tick further ahead than this is treated as an unreported seek.
    pub forward_jump_secs: f64,

    /// A tick further back than this is treated as an unreported seek.
    pub backward_jump_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_segment_secs: 0.5,
            forward_jump_secs: 2.0,
            backward_jump_secs: 0.5,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_segment_secs", self.min_segment_secs),
            ("forward_jump_secs", self.forward_jump_secs),
            ("backward_jump_secs", self.backward_jump_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a non-negative number, got {value}");
            }
        }
        Ok(())
    }
}
