//! Situational adjustment of the raw computed need.

use crate::calculator::DoseBreakdown;
use crate::context::{AdjustmentFlags, CalculatorSettings};
use crate::error::AdvisorError;

/// Outcome of the adjustment stage, pre-clamping to device limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedDose {
    /// Adjusted amount, floored at zero.
    pub amount: f64,
    /// raw × fraction, kept for display.
    pub scaled: f64,
    /// sweet_meal_factor × current basal, when superbolus was applied.
    pub super_bolus_addend: Option<f64>,
}

/// Apply at most one of {fatty-meal factor, superbolus addend} plus the
/// global scaling fraction, in fixed order.
///
/// The superbolus branch intentionally starts from the unscaled `raw`, not
/// from `raw × fraction`; the manual scaling fraction is bypassed while a
/// superbolus is active (pinned by `superbolus_bypasses_fraction`).
pub fn apply_adjustments(
    breakdown: &DoseBreakdown,
    flags: AdjustmentFlags,
    settings: &CalculatorSettings,
    current_basal_rate: Option<f64>,
) -> Result<AdjustedDose, AdvisorError> {
    if !settings.fraction.is_finite() {
        return Err(AdvisorError::NonFiniteInput("fraction"));
    }
    if !settings.fatty_meal_factor.is_finite() {
        return Err(AdvisorError::NonFiniteInput("fatty_meal_factor"));
    }
    if !settings.sweet_meal_factor.is_finite() {
        return Err(AdvisorError::NonFiniteInput("sweet_meal_factor"));
    }

    let scaled = breakdown.raw * settings.fraction;

    let (adjusted, super_bolus_addend) = if flags.fatty_meal_active() {
        (scaled * settings.fatty_meal_factor, None)
    } else if flags.super_bolus_active() {
        let basal = current_basal_rate.ok_or(AdvisorError::BasalScheduleGap)?;
        if !basal.is_finite() {
            return Err(AdvisorError::NonFiniteInput("current_basal_rate"));
        }
        let addend = settings.sweet_meal_factor * basal;
        (breakdown.raw + addend, Some(addend))
    } else {
        (scaled, None)
    };

    tracing::debug!(
        raw = breakdown.raw,
        scaled,
        adjusted,
        super_bolus_addend = ?super_bolus_addend,
        "adjustments applied"
    );

    Ok(AdjustedDose {
        amount: adjusted.max(0.0),
        scaled,
        super_bolus_addend,
    })
}
