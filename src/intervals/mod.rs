//! Pure functions over sets of watched intervals. No state, no I/O.

pub mod merge;
pub mod query;

pub use merge::{add_interval, merge};
pub use query::{is_watched, progress_percentage, total_watched, unwatched_gaps};
