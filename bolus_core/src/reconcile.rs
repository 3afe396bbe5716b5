//! Safety reconciliation: device clamping, increment rounding, and the
//! comparison against the independently computed algorithm recommendation.
//!
//! Two recommendations for the same event can legitimately disagree (a
//! linear local estimate vs. a full predictive simulation). The engine
//! never silently picks one; it classifies the disagreement and hands the
//! typed warning to the calling surface, which by policy prefers the lower
//! number unless the human overrides.

use crate::adjustment::AdjustedDose;
use crate::calculator::DoseBreakdown;
use crate::context::{
    AdjustmentFlags, AlgorithmRecommendation, CalculatorSettings, SafetyThresholds,
};
use crate::rounding::{EPS, round_to_increment};

/// Why the deliverable amount was reduced below the adjusted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapReason {
    MaxBolus,
}

/// The six literal predictive-mismatch reasons derived from the
/// algorithm's conflict code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictiveConflict {
    /// Codes 1–2: eventual glucose is above target, but glucose is
    /// predicted to first dip below the threshold (see min-guard glucose).
    GuardBelowThreshold,
    /// Code 3: glucose is climbing slower than expected.
    ClimbingSlowerThanExpected,
    /// Code 4: glucose is falling faster than expected.
    FallingFasterThanExpected,
    /// Code 5: glucose is changing faster than expected, either direction.
    ChangingFasterThanExpected,
    /// Code 6: predicted nadir is low, sub-case not distinguished
    /// (see min-predicted glucose).
    PredictedNadirLow,
    /// Any other nonzero code: the local calculation may be overly
    /// aggressive for the current glucose curve.
    PossiblyOverAggressive,
}

impl PredictiveConflict {
    /// `None` for code 0 (no conflict).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => None,
            1 | 2 => Some(Self::GuardBelowThreshold),
            3 => Some(Self::ClimbingSlowerThanExpected),
            4 => Some(Self::FallingFasterThanExpected),
            5 => Some(Self::ChangingFasterThanExpected),
            6 => Some(Self::PredictedNadirLow),
            _ => Some(Self::PossiblyOverAggressive),
        }
    }
}

/// Advisory classification attached to every result. None of these are
/// failures; the calling surface decides which ones require blocking
/// confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarningKind {
    Nominal,
    /// No algorithm recommendation was supplied; reconciliation skipped.
    Pending,
    /// The local amount exceeds the algorithm's; the algorithm's lower
    /// amount is carried as the safe default to offer.
    ExceedsAlgorithmRecommendation { algorithm_amount: f64 },
    /// Both the algorithm and the local calculation arrived at nothing
    /// to deliver.
    NotRecommended,
    Predictive(PredictiveConflict),
}

/// Final advisory output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationResult {
    /// Deliverable amount: clamped to [0, max bolus], rounded to the pump
    /// increment.
    pub amount: f64,
    pub warning: WarningKind,
    pub capped_by: Option<CapReason>,
    /// The unclamped computed need and its partial terms, for display.
    pub breakdown: DoseBreakdown,
    /// Superbolus addend that went into `amount`, if any.
    pub super_bolus_addend: Option<f64>,
}

/// Clamp, round, and classify the adjusted dose against the algorithm's
/// recommendation.
pub fn reconcile(
    adjusted: &AdjustedDose,
    breakdown: DoseBreakdown,
    flags: AdjustmentFlags,
    thresholds: &SafetyThresholds,
    settings: &CalculatorSettings,
    algorithm: Option<&AlgorithmRecommendation>,
) -> RecommendationResult {
    let mut capped_by = None;
    let mut capped = adjusted.amount;
    if capped > thresholds.max_bolus_units {
        capped = thresholds.max_bolus_units;
        capped_by = Some(CapReason::MaxBolus);
    }

    let rounded = round_to_increment(capped, thresholds.pump_increment_units);
    // Clamping happens before rounding; if rounding up crossed a cap that
    // is not aligned to the increment, step back down one increment.
    let amount = if rounded > thresholds.max_bolus_units + EPS {
        (rounded - thresholds.pump_increment_units).max(0.0)
    } else {
        rounded
    };

    let warning = match algorithm {
        None => WarningKind::Pending,
        Some(algo) => {
            let algorithm_amount =
                algo.scaled_amount(settings.insulin_req_percentage, thresholds.pump_increment_units);
            if amount > algorithm_amount + EPS && !flags.super_bolus_active() {
                WarningKind::ExceedsAlgorithmRecommendation { algorithm_amount }
            } else if algorithm_amount <= EPS && amount <= EPS {
                WarningKind::NotRecommended
            } else if let Some(conflict) = PredictiveConflict::from_code(algo.conflict_code)
                && amount > EPS
            {
                WarningKind::Predictive(conflict)
            } else {
                WarningKind::Nominal
            }
        }
    };

    tracing::debug!(
        amount,
        warning = ?warning,
        capped_by = ?capped_by,
        "recommendation reconciled"
    );

    RecommendationResult {
        amount,
        warning,
        capped_by,
        breakdown,
        super_bolus_addend: adjusted.super_bolus_addend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjusted(amount: f64) -> AdjustedDose {
        AdjustedDose {
            amount,
            scaled: amount,
            super_bolus_addend: None,
        }
    }

    fn run(amount: f64, algo: Option<&AlgorithmRecommendation>) -> RecommendationResult {
        reconcile(
            &adjusted(amount),
            DoseBreakdown::default(),
            AdjustmentFlags::NONE,
            &SafetyThresholds::default(),
            &CalculatorSettings::default(),
            algo,
        )
    }

    #[test]
    fn caps_at_max_bolus() {
        let r = run(12.0, None);
        assert!((r.amount - 10.0).abs() < EPS);
        assert_eq!(r.capped_by, Some(CapReason::MaxBolus));
    }

    #[test]
    fn missing_algorithm_recommendation_is_pending() {
        let r = run(2.0, None);
        assert_eq!(r.warning, WarningKind::Pending);
    }

    #[test]
    fn conflict_codes_map_to_the_six_reasons() {
        use PredictiveConflict::*;
        assert_eq!(PredictiveConflict::from_code(0), None);
        assert_eq!(PredictiveConflict::from_code(1), Some(GuardBelowThreshold));
        assert_eq!(PredictiveConflict::from_code(2), Some(GuardBelowThreshold));
        assert_eq!(
            PredictiveConflict::from_code(3),
            Some(ClimbingSlowerThanExpected)
        );
        assert_eq!(
            PredictiveConflict::from_code(4),
            Some(FallingFasterThanExpected)
        );
        assert_eq!(
            PredictiveConflict::from_code(5),
            Some(ChangingFasterThanExpected)
        );
        assert_eq!(PredictiveConflict::from_code(6), Some(PredictedNadirLow));
        assert_eq!(
            PredictiveConflict::from_code(7),
            Some(PossiblyOverAggressive)
        );
    }
}
