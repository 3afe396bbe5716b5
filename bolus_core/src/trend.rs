//! Fifteen-minute glucose trend from recent history.

use crate::types::GlucoseSample;

/// Samples needed before a trend can be derived: the newest reading compared
/// against the reading three positions back (~15 min at 5-min sampling).
pub const TREND_SAMPLES: usize = 4;

/// Delta between the most recent reading and the fourth-most-recent one.
///
/// Returns `None` when fewer than [`TREND_SAMPLES`] readings exist. Callers
/// must treat absence differently from a measured delta of zero: absence
/// excludes the trend term from the dose arithmetic entirely.
pub fn fifteen_minute_delta(samples: &[GlucoseSample]) -> Option<f64> {
    if samples.len() < TREND_SAMPLES {
        return None;
    }
    Some(samples[0].value - samples[TREND_SAMPLES - 1].value)
}
