//! Presentation of a `RecommendationResult` as text or JSON.
//!
//! Unit conversion for the predictive guard values happens here, at the
//! display boundary; the engine itself never converts units.

use bolus_core::{
    AlgorithmRecommendation, GlucoseUnits, PredictiveConflict, RecommendationResult, WarningKind,
};

fn display_glucose(value: f64, units: GlucoseUnits) -> String {
    match units {
        GlucoseUnits::MgDl => format!("{value:.0} mg/dL"),
        GlucoseUnits::MmolL => format!("{:.1} mmol/L", value * 0.0555),
    }
}

/// Human-readable warning line, mirroring the phrasing the advisory
/// surfaces show for each predictive-mismatch reason.
pub fn warning_text(
    result: &RecommendationResult,
    algo: Option<&AlgorithmRecommendation>,
    units: GlucoseUnits,
    low_glucose_threshold: f64,
) -> String {
    match &result.warning {
        WarningKind::Nominal => "No warnings.".to_string(),
        WarningKind::Pending => {
            "Predictive algorithm recommendation pending; comparison skipped.".to_string()
        }
        WarningKind::NotRecommended => "Bolus not recommended.".to_string(),
        WarningKind::ExceedsAlgorithmRecommendation { algorithm_amount } => format!(
            "Warning: exceeds the algorithm's recommendation of {algorithm_amount:.2} U; \
             the lower amount is the safe default."
        ),
        WarningKind::Predictive(conflict) => {
            let a = algo.copied().unwrap_or_default();
            match conflict {
                PredictiveConflict::GuardBelowThreshold => format!(
                    "Warning: eventual glucose is above target, but glucose is predicted to \
                     first drop down to {}, below your threshold ({}).",
                    display_glucose(a.min_guard_glucose, units),
                    display_glucose(low_glucose_threshold, units),
                ),
                PredictiveConflict::ClimbingSlowerThanExpected => format!(
                    "Warning: glucose is climbing slower than expected. Expected: {}. Climbing: {}.",
                    display_glucose(a.expected_delta, units),
                    display_glucose(a.min_delta, units),
                ),
                PredictiveConflict::FallingFasterThanExpected => format!(
                    "Warning: glucose is falling faster than expected. Expected: {}. Falling: {}.",
                    display_glucose(a.expected_delta, units),
                    display_glucose(a.min_delta, units),
                ),
                PredictiveConflict::ChangingFasterThanExpected => format!(
                    "Warning: glucose is changing faster than expected. Expected: {}. Changing: {}.",
                    display_glucose(a.expected_delta, units),
                    display_glucose(a.min_delta, units),
                ),
                PredictiveConflict::PredictedNadirLow => format!(
                    "Warning: glucose is predicted to first drop down to {}.",
                    display_glucose(a.min_predicted_glucose, units),
                ),
                PredictiveConflict::PossiblyOverAggressive => {
                    "Warning: the calculation may be too aggressive for the current glucose curve."
                        .to_string()
                }
            }
        }
    }
}

pub fn render_text(
    result: &RecommendationResult,
    algo: Option<&AlgorithmRecommendation>,
    units: GlucoseUnits,
    low_glucose_threshold: f64,
) -> String {
    let b = &result.breakdown;
    let mut out = String::new();
    out.push_str(&format!("Recommended bolus: {:.2} U\n", result.amount));
    out.push_str(&format!("Total computed need: {:.2} U\n", b.raw_rounded));
    out.push_str(&format!("  target deviation: {:+.2} U\n", b.target_deviation));
    match b.trend {
        Some(t) => out.push_str(&format!("  15-min trend:     {t:+.2} U\n")),
        None => out.push_str("  15-min trend:     (insufficient history)\n"),
    }
    out.push_str(&format!("  carbs on board:   {:+.2} U\n", b.cob));
    out.push_str(&format!("  insulin on board: {:+.2} U\n", b.iob));
    if b.glucose_reading_missing {
        out.push_str("  (no glucose reading: deviation and trend excluded)\n");
    }
    if let Some(addend) = result.super_bolus_addend {
        out.push_str(&format!("  superbolus addend: {addend:+.2} U\n"));
    }
    if result.capped_by.is_some() {
        out.push_str("Capped at the pump's maximum bolus.\n");
    }
    out.push_str(&warning_text(result, algo, units, low_glucose_threshold));
    out.push('\n');
    out
}

pub fn render_json(
    result: &RecommendationResult,
    algo: Option<&AlgorithmRecommendation>,
    units: GlucoseUnits,
    low_glucose_threshold: f64,
) -> serde_json::Value {
    let b = &result.breakdown;
    serde_json::json!({
        "amount": result.amount,
        "computed_need": b.raw_rounded,
        "breakdown": {
            "target_deviation": b.target_deviation,
            "trend": b.trend,
            "cob": b.cob,
            "iob": b.iob,
            "glucose_reading_missing": b.glucose_reading_missing,
            "super_bolus_addend": result.super_bolus_addend,
        },
        "capped": result.capped_by.is_some(),
        "warning": format!("{:?}", result.warning),
        "warning_text": warning_text(result, algo, units, low_glucose_threshold),
    })
}
