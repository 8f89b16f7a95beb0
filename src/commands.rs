use std::{
    fmt::Write as _,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::{
    db::Database,
    models::Interval,
    settings::SettingsStore,
    store::SqliteStore,
    tracker::{PlaybackEvent, ProgressTracker, TrackerConfig},
    utils::format_timestamp,
};

const DEFAULT_DB_FILE: &str = "watchtrail.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "watchtrail")]
#[command(about = "Track which parts of a video have really been watched")]
#[command(version)]
pub struct Cli {
    /// SQLite file holding saved progress
    #[arg(long, env = "WATCHTRAIL_DB")]
    db: Option<PathBuf>,

    /// JSON settings file with tracker thresholds
    #[arg(long, env = "WATCHTRAIL_SETTINGS", default_value = "watchtrail.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a JSON-lines playback log into the tracker for CONTENT_ID
    Replay {
        content_id: String,
        events: PathBuf,
    },
    /// Print saved progress for CONTENT_ID
    Show { content_id: String },
    /// Delete saved progress for CONTENT_ID
    Reset { content_id: String },
    /// List every piece of content with saved progress
    List,
    /// Show or change tracker thresholds
    Config {
        #[arg(long)]
        min_segment_secs: Option<f64>,
        #[arg(long)]
        forward_jump_secs: Option<f64>,
        #[arg(long)]
        backward_jump_secs: Option<f64>,
    },
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let settings = SettingsStore::new(cli.settings.clone())?;
    let config = settings.tracker_config();

    match cli.command {
        Command::Replay { content_id, events } => {
            let db = open_database(cli.db, &settings)?;
            replay(&db, config, &content_id, &events)
        }
        Command::Show { content_id } => {
            let db = open_database(cli.db, &settings)?;
            let tracker = open_tracker(&db, config, &content_id);
            print!("{}", describe(&tracker));
            Ok(())
        }
        Command::Reset { content_id } => {
            let db = open_database(cli.db, &settings)?;
            let mut tracker = open_tracker(&db, config, &content_id);
            tracker.reset();
            println!("Progress for {content_id} cleared");
            Ok(())
        }
        Command::List => {
            let db = open_database(cli.db, &settings)?;
            list(&db)
        }
        Command::Config {
            min_segment_secs,
            forward_jump_secs,
            backward_jump_secs,
        } => update_config(
            &settings,
            min_segment_secs,
            forward_jump_secs,
            backward_jump_secs,
        ),
    }
}

/// `--db` / `WATCHTRAIL_DB` first, then the settings file, then the working directory.
fn open_database(explicit: Option<PathBuf>, settings: &SettingsStore) -> Result<Database> {
    let db_path = explicit
        .or_else(|| settings.database_path())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    Database::new(db_path)
}

fn open_tracker(db: &Database, config: TrackerConfig, content_id: &str) -> ProgressTracker {
    let store = Arc::new(SqliteStore::new(db.clone()));
    ProgressTracker::open(content_id, store, config)
}

/// Counts for a finished replay.
#[derive(Debug, Default, PartialEq)]
struct ReplaySummary {
    applied: usize,
    rejected: usize,
    unparseable: usize,
}

fn replay(db: &Database, config: TrackerConfig, content_id: &str, events: &Path) -> Result<()> {
    let file = File::open(events)
        .with_context(|| format!("failed to open event log {}", events.display()))?;

    let mut tracker = open_tracker(db, config, content_id);
    let summary = replay_lines(&mut tracker, BufReader::new(file))?;
    tracker.flush()?;

    info!(
        "Replayed {} events for {} ({} rejected, {} unparseable)",
        summary.applied, content_id, summary.rejected, summary.unparseable
    );

    print!("{}", describe(&tracker));
    println!(
        "events: {} applied, {} rejected, {} unparseable",
        summary.applied, summary.rejected, summary.unparseable
    );
    Ok(())
}

/// Bad lines and rejected events are logged and skipped; the rest of the log
/// still counts.
fn replay_lines(tracker: &mut ProgressTracker, reader: impl BufRead) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read event log")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: PlaybackEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                warn!("line {}: unparseable event: {}", index + 1, err);
                summary.unparseable += 1;
                continue;
            }
        };

        match tracker.apply(event) {
            Ok(_) => summary.applied += 1,
            Err(err) => {
                warn!("line {}: {}", index + 1, err);
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

fn list(db: &Database) -> Result<()> {
    let entries = db.list_progress()?;
    if entries.is_empty() {
        println!("No saved progress");
        return Ok(());
    }

    for entry in entries {
        let snapshot = &entry.snapshot;
        println!(
            "{:<24} {:>6.1}%  {} / {}  updated {}",
            entry.content_id,
            crate::intervals::progress_percentage(&snapshot.intervals, snapshot.total_duration),
            format_timestamp(crate::intervals::total_watched(&snapshot.intervals)),
            format_timestamp(snapshot.total_duration),
            entry.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

fn update_config(
    settings: &SettingsStore,
    min_segment_secs: Option<f64>,
    forward_jump_secs: Option<f64>,
    backward_jump_secs: Option<f64>,
) -> Result<()> {
    let mut config = settings.tracker_config();
    let changed =
        min_segment_secs.is_some() || forward_jump_secs.is_some() || backward_jump_secs.is_some();

    if let Some(value) = min_segment_secs {
        config.min_segment_secs = value;
    }
    if let Some(value) = forward_jump_secs {
        config.forward_jump_secs = value;
    }
    if let Some(value) = backward_jump_secs {
        config.backward_jump_secs = value;
    }

    if changed {
        settings.update_tracker_config(config)?;
        info!("Saved tracker settings to {}", settings.path().display());
    }

    println!("min_segment_secs   = {}", config.min_segment_secs);
    println!("forward_jump_secs  = {}", config.forward_jump_secs);
    println!("backward_jump_secs = {}", config.backward_jump_secs);
    Ok(())
}

fn describe_intervals(intervals: &[Interval]) -> String {
    if intervals.is_empty() {
        return "-".to_string();
    }
    intervals
        .iter()
        .map(|interval| {
            format!(
                "{}-{}",
                format_timestamp(interval.start),
                format_timestamp(interval.end)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(tracker: &ProgressTracker) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tracker.content_id());
    let _ = writeln!(
        out,
        "  progress: {:.1}%{}",
        tracker.progress_percentage(),
        if tracker.is_complete() { " (complete)" } else { "" }
    );
    let _ = writeln!(
        out,
        "  watched:  {} of {}",
        format_timestamp(tracker.total_watched_seconds()),
        format_timestamp(tracker.total_duration())
    );
    let _ = writeln!(out, "  segments: {}", describe_intervals(tracker.intervals()));
    let _ = writeln!(out, "  unwatched: {}", describe_intervals(&tracker.unwatched_gaps()));
    match tracker.resume_position() {
        Some(position) => {
            let _ = writeln!(out, "  resume at {}", format_timestamp(position));
        }
        None => {
            let _ = writeln!(out, "  resume at start");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tracker() -> ProgressTracker {
        ProgressTracker::open("demo", Arc::new(MemoryStore::new()), TrackerConfig::default())
    }

    #[test]
    fn replay_skips_bad_lines_and_keeps_going() {
        let log = r#"
{"type": "durationKnown", "seconds": 100}
{"type": "play", "time": 0}
{"type": "timeUpdate", "time": 1}
this is not json
{"type": "seek", "time": 50}
{"type": "pause", "time": -4}
{"type": "pause", "time": 52}
"#;

        let mut tracker = tracker();
        let summary = replay_lines(&mut tracker, log.as_bytes()).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 5,
                rejected: 1,
                unparseable: 1,
            }
        );
        assert_eq!(tracker.total_watched_seconds(), 3.0);
        assert_eq!(tracker.progress_percentage(), 3.0);
    }

    #[test]
    fn describe_reports_progress_and_gaps() {
        let mut tracker = tracker();
        tracker.set_duration(120.0).unwrap();
        tracker.play(0.0).unwrap();
        tracker.pause(30.0).unwrap();

        let report = describe(&tracker);
        assert!(report.contains("progress: 25.0%"));
        assert!(report.contains("watched:  0:30 of 2:00"));
        assert!(report.contains("segments: 0:00-0:30"));
        assert!(report.contains("unwatched: 0:30-2:00"));
        assert!(report.contains("resume at 0:30"));
    }

    #[test]
    fn cli_parses_replay() {
        let cli = Cli::try_parse_from([
            "watchtrail",
            "--db",
            "/tmp/x.sqlite3",
            "replay",
            "lecture-7",
            "events.jsonl",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.sqlite3")));
        match cli.command {
            Command::Replay { content_id, events } => {
                assert_eq!(content_id, "lecture-7");
                assert_eq!(events, PathBuf::from("events.jsonl"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
