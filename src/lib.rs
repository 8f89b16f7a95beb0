//! Watched-interval tracking for linear media.
//!
//! Playback events go into a [`ProgressTracker`], which folds genuinely
//! watched segments into a merged interval set through the pure functions in
//! [`intervals`] and saves snapshots through a [`SnapshotStore`].

mod commands;
pub mod db;
pub mod error;
pub mod intervals;
pub mod models;
pub mod settings;
pub mod store;
pub mod tracker;
pub mod utils;

use clap::Parser;

pub use error::ProgressError;
pub use models::{Interval, ProgressSnapshot};
pub use store::{MemoryStore, SnapshotStore, SqliteStore};
pub use tracker::{EventOutcome, PlaybackEvent, ProgressTracker, TrackerConfig, TrackerStatus};

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var, info by default)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = commands::Cli::parse();
    commands::dispatch(cli)
}
