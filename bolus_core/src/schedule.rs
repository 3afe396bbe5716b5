//! Piecewise basal-rate schedule and current-rate resolution.

use bolus_traits::Clock;

use crate::types::TimeOfDay;

/// One segment of the daily basal schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasalSegment {
    /// Segment start, seconds since midnight.
    pub start: TimeOfDay,
    /// Insulin units per hour.
    pub rate: f64,
}

/// Ordered daily basal schedule. Segments are expected sorted by `start`
/// (config validation enforces this); each covers `[start, next_start)`
/// and the final segment is open-ended up to "now" rather than wrapping
/// at midnight.
#[derive(Debug, Clone, Default)]
pub struct BasalSchedule {
    segments: Vec<BasalSegment>,
}

impl BasalSchedule {
    pub fn new(segments: Vec<BasalSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[BasalSegment] {
        &self.segments
    }

    /// Rate of the segment covering `now`, or `None` when no segment
    /// matches (empty or malformed schedule). Callers must handle the gap
    /// explicitly; there is no default rate.
    pub fn current_rate(&self, now: TimeOfDay) -> Option<f64> {
        for (i, seg) in self.segments.iter().enumerate() {
            match self.segments.get(i + 1) {
                Some(next) => {
                    if now >= seg.start && now < next.start {
                        return Some(seg.rate);
                    }
                }
                None => {
                    if now >= seg.start {
                        return Some(seg.rate);
                    }
                }
            }
        }
        None
    }

    /// Resolve the active rate against a wall clock.
    pub fn current_rate_at(&self, clock: &dyn Clock) -> Option<f64> {
        self.current_rate(clock.seconds_since_midnight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> BasalSchedule {
        BasalSchedule::new(vec![
            BasalSegment {
                start: 0,
                rate: 0.8,
            },
            BasalSegment {
                start: 6 * 3600,
                rate: 1.2,
            },
            BasalSegment {
                start: 22 * 3600,
                rate: 0.9,
            },
        ])
    }

    #[test]
    fn picks_segment_by_half_open_interval() {
        let s = schedule();
        assert_eq!(s.current_rate(0), Some(0.8));
        assert_eq!(s.current_rate(6 * 3600 - 1), Some(0.8));
        assert_eq!(s.current_rate(6 * 3600), Some(1.2));
        assert_eq!(s.current_rate(21 * 3600), Some(1.2));
    }

    #[test]
    fn final_segment_is_open_ended() {
        let s = schedule();
        assert_eq!(s.current_rate(22 * 3600), Some(0.9));
        assert_eq!(s.current_rate(86_399), Some(0.9));
    }

    #[test]
    fn empty_schedule_is_a_gap() {
        let s = BasalSchedule::default();
        assert_eq!(s.current_rate(12 * 3600), None);
    }

    #[test]
    fn time_before_first_segment_is_a_gap() {
        let s = BasalSchedule::new(vec![BasalSegment {
            start: 8 * 3600,
            rate: 1.0,
        }]);
        assert_eq!(s.current_rate(7 * 3600), None);
        assert_eq!(s.current_rate(9 * 3600), Some(1.0));
    }

    #[test]
    fn resolves_through_clock() {
        use bolus_traits::clock::test_clock::FixedClock;
        let s = schedule();
        let clock = FixedClock::at(7 * 3600);
        assert_eq!(s.current_rate_at(&clock), Some(1.2));
        clock.set(23 * 3600);
        assert_eq!(s.current_rate_at(&clock), Some(0.9));
    }
}
