//! Shared value types for the advisory engine.

/// Seconds since midnight, [0, 86400).
pub type TimeOfDay = u32;

/// One glucose reading, in the configured glucose unit.
/// Sequences are ordered most-recent-first and immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseSample {
    pub value: f64,
    /// Age of the reading relative to "now", in minutes.
    pub minutes_ago: u32,
}

/// Glucose unit system the caller works in. The engine applies exactly the
/// one conversion factor this implies and makes no other unit decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlucoseUnits {
    #[default]
    MgDl,
    MmolL,
}

impl GlucoseUnits {
    /// mg/dL⇄mmol/L factor applied to glucose differences before dividing
    /// by the ISF.
    #[inline]
    pub fn conversion_factor(self) -> f64 {
        match self {
            Self::MgDl => 1.0,
            Self::MmolL => 0.0555,
        }
    }
}
