pub mod interval;
pub mod snapshot;

pub use interval::Interval;
pub use snapshot::ProgressSnapshot;
