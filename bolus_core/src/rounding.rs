//! Increment rounding helpers.
//!
//! Delivery amounts are quantized to the pump's smallest deliverable step
//! (round-half-up), and the informational "total computed need" is shown at
//! two decimals. Comparisons downstream use [`EPS`] to absorb the float
//! noise the quantization leaves behind.

/// Tolerance for comparing two independently rounded insulin amounts.
pub const EPS: f64 = 1e-9;

/// Round `value` to the nearest multiple of `increment`, half up.
///
/// Idempotent: rounding an already-rounded value is a no-op (within [`EPS`]).
/// A non-positive or non-finite increment leaves the value untouched.
#[inline]
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    if !value.is_finite() || !increment.is_finite() || increment <= 0.0 {
        return value;
    }
    let steps = (value / increment + 0.5).floor();
    steps * increment
}

/// Round to two decimal places, half away from zero for positives.
#[inline]
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_pump_increment() {
        assert!((round_to_increment(2.24, 0.05) - 2.25).abs() < EPS);
        assert!((round_to_increment(2.22, 0.05) - 2.20).abs() < EPS);
        assert!((round_to_increment(0.025, 0.05) - 0.05).abs() < EPS);
        assert_eq!(round_to_increment(0.0, 0.05), 0.0);
    }

    #[test]
    fn idempotent() {
        for v in [0.01, 0.33, 2.24, 7.777, 9.99] {
            let once = round_to_increment(v, 0.05);
            let twice = round_to_increment(once, 0.05);
            assert!((once - twice).abs() < EPS, "{v}: {once} vs {twice}");
        }
    }

    #[test]
    fn degenerate_increment_passes_through() {
        assert_eq!(round_to_increment(1.234, 0.0), 1.234);
        assert_eq!(round_to_increment(1.234, -0.1), 1.234);
        assert_eq!(round_to_increment(1.234, f64::NAN), 1.234);
    }

    #[test]
    fn two_decimal_rounding() {
        assert_eq!(round2(2.804), 2.8);
        assert_eq!(round2(2.806), 2.81);
        assert_eq!(round2(-1.004), -1.0);
    }
}
