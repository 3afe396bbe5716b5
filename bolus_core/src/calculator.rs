//! The arithmetic core: partial insulin terms and their combination.

use crate::context::DoseContext;
use crate::error::AdvisorError;
use crate::rounding::round2;

/// The four partial terms (all in insulin units) plus the combined raw need.
///
/// `raw` may be negative; it is never clamped here. `raw_rounded` is the
/// two-decimal "total computed need" surfaced to the caller and stays
/// visible even after later clamping changes the deliverable amount.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoseBreakdown {
    /// (current − target) × conversion / ISF, or 0 when no reading exists.
    pub target_deviation: f64,
    /// Trend term; `None` marks insufficient trend history, which is
    /// distinct from a measured delta of zero.
    pub trend: Option<f64>,
    /// carbs-on-board / carb ratio.
    pub cob: f64,
    /// Negated insulin-on-board.
    pub iob: f64,
    /// True when no current glucose reading was available, so the deviation
    /// and trend terms were excluded rather than zeroed.
    pub glucose_reading_missing: bool,
    pub raw: f64,
    /// `raw` rounded to two decimals, informational.
    pub raw_rounded: f64,
}

fn ensure_finite(value: f64, name: &'static str) -> Result<(), AdvisorError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AdvisorError::NonFiniteInput(name))
    }
}

/// Compute the unadjusted dose terms from a context snapshot.
///
/// The combination is a three-way branch, not a plain sum of zeroed terms:
/// - trend delta present (even zero): deviation + IOB + COB + trend
/// - no glucose reading: IOB + COB only
/// - reading but no trend history: deviation + IOB + COB
pub fn compute_breakdown(ctx: &DoseContext) -> Result<DoseBreakdown, AdvisorError> {
    ensure_finite(ctx.target_glucose, "target_glucose")?;
    ensure_finite(ctx.isf, "isf")?;
    ensure_finite(ctx.carb_ratio, "carb_ratio")?;
    ensure_finite(ctx.insulin_on_board, "insulin_on_board")?;
    ensure_finite(ctx.carbs_on_board, "carbs_on_board")?;
    ensure_finite(ctx.conversion_factor, "conversion_factor")?;
    if let Some(bg) = ctx.current_glucose {
        ensure_finite(bg, "current_glucose")?;
    }
    if let Some(d) = ctx.fifteen_minute_delta {
        ensure_finite(d, "fifteen_minute_delta")?;
    }
    if ctx.isf == 0.0 {
        return Err(AdvisorError::DivisionUndefined("isf"));
    }
    if ctx.carb_ratio == 0.0 {
        return Err(AdvisorError::DivisionUndefined("carb_ratio"));
    }

    let conv = ctx.conversion_factor;
    let cob = ctx.carbs_on_board / ctx.carb_ratio;
    let iob = -ctx.insulin_on_board;

    let breakdown = match (ctx.current_glucose, ctx.fifteen_minute_delta) {
        (Some(bg), Some(delta)) => {
            let target_deviation = (bg - ctx.target_glucose) * conv / ctx.isf;
            let trend = (delta * conv) / ctx.isf;
            DoseBreakdown {
                target_deviation,
                trend: Some(trend),
                cob,
                iob,
                glucose_reading_missing: false,
                raw: target_deviation + iob + cob + trend,
                raw_rounded: 0.0,
            }
        }
        (Some(bg), None) => {
            let target_deviation = (bg - ctx.target_glucose) * conv / ctx.isf;
            DoseBreakdown {
                target_deviation,
                trend: None,
                cob,
                iob,
                glucose_reading_missing: false,
                raw: target_deviation + iob + cob,
                raw_rounded: 0.0,
            }
        }
        // No reading at all: deviation and trend are excluded entirely.
        (None, _) => DoseBreakdown {
            target_deviation: 0.0,
            trend: None,
            cob,
            iob,
            glucose_reading_missing: true,
            raw: iob + cob,
            raw_rounded: 0.0,
        },
    };

    let breakdown = DoseBreakdown {
        raw_rounded: round2(breakdown.raw),
        ..breakdown
    };

    tracing::debug!(
        target_deviation = breakdown.target_deviation,
        trend = ?breakdown.trend,
        cob = breakdown.cob,
        iob = breakdown.iob,
        raw = breakdown.raw,
        "dose breakdown computed"
    );
    Ok(breakdown)
}
