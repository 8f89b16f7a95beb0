use serde::{Deserialize, Serialize};

use super::TrackerStatus;
use crate::models::Interval;

/// A playback notification as delivered by the player, one per JSON line in a
/// replay log: `{"type": "timeUpdate", "time": 12.4}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    Play { time: f64 },
    Pause { time: f64 },
    Seek { time: f64 },
    TimeUpdate { time: f64 },
    DurationKnown { seconds: f64 },
}

/// What an accepted event did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOutcome {
    /// The segment folded into the watched set, if this event closed one that
    /// was long enough to count.
    pub committed: Option<Interval>,
    pub status: TrackerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_events() {
        let event: PlaybackEvent =
            serde_json::from_str(r#"{"type": "timeUpdate", "time": 12.5}"#).unwrap();
        assert_eq!(event, PlaybackEvent::TimeUpdate { time: 12.5 });

        let event: PlaybackEvent =
            serde_json::from_str(r#"{"type": "durationKnown", "seconds": 600}"#).unwrap();
        assert_eq!(event, PlaybackEvent::DurationKnown { seconds: 600.0 });
    }

    #[test]
    fn unknown_event_type_is_an_error() {
        assert!(serde_json::from_str::<PlaybackEvent>(r#"{"type": "volume", "time": 1}"#).is_err());
    }
}
