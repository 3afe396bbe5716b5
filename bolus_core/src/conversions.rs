//! `From` implementations bridging `bolus_config` schemas to core types.

use crate::context::{
    AlgorithmRecommendation, CalculatorSettings, SafetyThresholds, TherapyProfile,
};
use crate::schedule::{BasalSchedule, BasalSegment};
use crate::types::GlucoseUnits;

// ── Units ────────────────────────────────────────────────────────────────────

impl From<bolus_config::Units> for GlucoseUnits {
    fn from(u: bolus_config::Units) -> Self {
        match u {
            bolus_config::Units::Mgdl => Self::MgDl,
            bolus_config::Units::Mmol => Self::MmolL,
        }
    }
}

// ── TherapyProfile ───────────────────────────────────────────────────────────

impl From<&bolus_config::Therapy> for TherapyProfile {
    fn from(t: &bolus_config::Therapy) -> Self {
        Self {
            isf: t.isf,
            carb_ratio: t.carb_ratio,
            target_glucose: t.target_glucose,
            units: t.units.into(),
        }
    }
}

// ── SafetyThresholds ─────────────────────────────────────────────────────────

impl From<&bolus_config::Safety> for SafetyThresholds {
    fn from(s: &bolus_config::Safety) -> Self {
        Self {
            max_bolus_units: s.max_bolus_units,
            max_carbs_grams: s.max_carbs_grams,
            pump_increment_units: s.pump_increment_units,
            low_glucose_threshold: s.low_glucose_threshold,
        }
    }
}

// ── CalculatorSettings ───────────────────────────────────────────────────────

impl From<&bolus_config::Calculator> for CalculatorSettings {
    fn from(c: &bolus_config::Calculator) -> Self {
        Self {
            fraction: c.fraction,
            fatty_meal_factor: c.fatty_meal_factor,
            fatty_meal_trigger: c.fatty_meal_trigger,
            sweet_meal_factor: c.sweet_meal_factor,
            insulin_req_percentage: c.insulin_req_percentage,
            half_basal_target: c.half_basal_target,
        }
    }
}

// ── BasalSchedule ────────────────────────────────────────────────────────────

/// Bridge validated config entries into a schedule. Start strings are
/// parsed here; run `bolus_config::validate_basal` first for ordering and
/// range errors with proper context.
pub fn schedule_from_entries(entries: &[bolus_config::BasalEntry]) -> eyre::Result<BasalSchedule> {
    let mut segments = Vec::with_capacity(entries.len());
    for e in entries {
        segments.push(BasalSegment {
            start: bolus_config::parse_start(&e.start)?,
            rate: e.rate,
        });
    }
    Ok(BasalSchedule::new(segments))
}

// ── AlgorithmRecommendation ──────────────────────────────────────────────────

impl From<&bolus_config::Suggestion> for AlgorithmRecommendation {
    fn from(s: &bolus_config::Suggestion) -> Self {
        Self {
            insulin_for_manual_bolus: s.insulin_for_manual_bolus,
            eventual_glucose: s.eventual_glucose,
            min_guard_glucose: s.min_guard_glucose,
            min_predicted_glucose: s.min_predicted_glucose,
            min_delta: s.min_delta,
            expected_delta: s.expected_delta,
            conflict_code: s.conflict_code,
        }
    }
}
