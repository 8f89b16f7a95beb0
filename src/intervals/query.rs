use crate::models::Interval;

use super::merge;

/// Unique seconds covered by the intervals. Overlaps are counted once.
pub fn total_watched(intervals: &[Interval]) -> f64 {
    merge(intervals).iter().map(Interval::duration).sum()
}

/// Share of `total_duration` that has been watched, clamped to `[0, 100]`.
pub fn progress_percentage(intervals: &[Interval], total_duration: f64) -> f64 {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return 0.0;
    }

    let percentage = 100.0 * total_watched(intervals) / total_duration;
    percentage.clamp(0.0, 100.0)
}

pub fn is_watched(intervals: &[Interval], instant: f64) -> bool {
    merge(intervals)
        .iter()
        .any(|interval| interval.contains(instant))
}

/// The parts of `[0, total_duration]` not covered by any interval.
pub fn unwatched_gaps(intervals: &[Interval], total_duration: f64) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut cursor = 0.0;

    for interval in merge(intervals) {
        if interval.start > cursor {
            gaps.push(Interval {
                start: cursor,
                end: interval.start,
            });
        }
        cursor = interval.end;
    }

    if cursor < total_duration {
        gaps.push(Interval {
            start: cursor,
            end: total_duration,
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> Interval {
        Interval { start, end }
    }

    #[test]
    fn overlapping_spans_are_not_double_counted() {
        assert_eq!(total_watched(&[iv(0.0, 10.0), iv(5.0, 15.0)]), 15.0);
        assert_eq!(total_watched(&[iv(0.0, 10.0), iv(0.0, 10.0)]), 10.0);
        assert_eq!(total_watched(&[]), 0.0);
    }

    #[test]
    fn percentage_of_unknown_duration_is_zero() {
        assert_eq!(progress_percentage(&[iv(0.0, 10.0)], 0.0), 0.0);
        assert_eq!(progress_percentage(&[iv(0.0, 10.0)], -5.0), 0.0);
        assert_eq!(progress_percentage(&[iv(0.0, 10.0)], f64::NAN), 0.0);
    }

    #[test]
    fn percentage_is_clamped_to_one_hundred() {
        assert_eq!(progress_percentage(&[iv(0.0, 100.2)], 100.0), 100.0);
        assert_eq!(progress_percentage(&[iv(0.0, 0.1 + 0.2)], 0.3), 100.0);
        assert_eq!(progress_percentage(&[iv(0.0, 25.0)], 100.0), 25.0);
    }

    #[test]
    fn is_watched_uses_half_open_bounds() {
        let intervals = [iv(10.0, 20.0), iv(0.0, 5.0)];
        assert!(is_watched(&intervals, 0.0));
        assert!(is_watched(&intervals, 19.5));
        assert!(!is_watched(&intervals, 5.0));
        assert!(!is_watched(&intervals, 20.0));
        assert!(!is_watched(&intervals, 7.0));
    }

    #[test]
    fn is_watched_sees_fused_adjacent_spans() {
        // [0,5] and [5,10] fuse, so 5.0 is inside the merged span.
        assert!(is_watched(&[iv(0.0, 5.0), iv(5.0, 10.0)], 5.0));
    }

    #[test]
    fn gaps_cover_leading_inner_and_trailing_space() {
        let gaps = unwatched_gaps(&[iv(10.0, 20.0), iv(30.0, 40.0)], 60.0);
        assert_eq!(gaps, vec![iv(0.0, 10.0), iv(20.0, 30.0), iv(40.0, 60.0)]);
    }

    #[test]
    fn nothing_watched_is_one_gap() {
        assert_eq!(unwatched_gaps(&[], 42.0), vec![iv(0.0, 42.0)]);
        assert!(unwatched_gaps(&[], 0.0).is_empty());
    }

    #[test]
    fn fully_watched_has_no_gaps() {
        assert!(unwatched_gaps(&[iv(0.0, 30.0)], 30.0).is_empty());
    }

    #[test]
    fn gaps_and_watched_tile_the_timeline() {
        let intervals = [iv(3.0, 7.0), iv(6.0, 9.0), iv(12.0, 12.5), iv(20.0, 25.0)];
        let duration = 25.0;

        let mut pieces = merge(&intervals);
        pieces.extend(unwatched_gaps(&intervals, duration));
        pieces.sort_by(|a, b| a.start.total_cmp(&b.start));

        assert_eq!(pieces.first().map(|p| p.start), Some(0.0));
        assert_eq!(pieces.last().map(|p| p.end), Some(duration));
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }

        let covered: f64 = pieces.iter().map(Interval::duration).sum();
        assert_eq!(covered, duration);
    }
}
