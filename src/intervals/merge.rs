use crate::error::ProgressError;
use crate::models::Interval;

/// Fold a list of intervals into a sorted, non-overlapping set.
///
/// Touching intervals (`a.end == b.start`) are fused as well, so for any two
/// consecutive results `prev.end < next.start` holds strictly.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(tail) if interval.start <= tail.end => {
                tail.end = tail.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// Add a watched span to an existing set, returning the re-merged set.
///
/// An invalid candidate is rejected and the caller keeps what it had.
pub fn add_interval(
    existing: &[Interval],
    candidate: Interval,
) -> Result<Vec<Interval>, ProgressError> {
    candidate.validate()?;

    let mut all = Vec::with_capacity(existing.len() + 1);
    all.extend_from_slice(existing);
    all.push(candidate);
    Ok(merge(&all))
}
