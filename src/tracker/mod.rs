pub mod config;
pub mod controller;
pub mod events;
pub mod state;

pub use config::TrackerConfig;
pub use controller::ProgressTracker;
pub use events::{EventOutcome, PlaybackEvent};
pub use state::{SessionState, TrackerStatus, TrackingCursor};
