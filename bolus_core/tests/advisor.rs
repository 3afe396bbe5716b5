use bolus_core::{
    AdjustmentFlags, AdvisorError, AlgorithmRecommendation, BolusAdvisor, CalculatorSettings,
    CapReason, DoseContext, SafetyThresholds, WarningKind,
};

const EPS: f64 = 1e-9;

fn advisor() -> BolusAdvisor {
    BolusAdvisor::builder()
        .with_thresholds(SafetyThresholds {
            max_bolus_units: 10.0,
            ..Default::default()
        })
        .with_settings(CalculatorSettings {
            fraction: 0.8,
            sweet_meal_factor: 2.0,
            ..Default::default()
        })
        .build()
        .expect("valid advisor")
}

fn ctx() -> DoseContext {
    DoseContext {
        current_glucose: Some(180.0),
        target_glucose: 100.0,
        isf: 50.0,
        carb_ratio: 10.0,
        insulin_on_board: 2.0,
        carbs_on_board: 30.0,
        current_basal_rate: Some(1.0),
        fifteen_minute_delta: Some(10.0),
        conversion_factor: 1.0,
    }
}

fn agreeing_algo() -> AlgorithmRecommendation {
    AlgorithmRecommendation {
        insulin_for_manual_bolus: 2.3,
        eventual_glucose: 140.0,
        ..Default::default()
    }
}

#[test]
fn textbook_correction_rounds_to_pump_increment() {
    // deviation 1.6 + trend 0.2 + cob 3.0 + iob -2.0 = 2.8 raw,
    // × 0.8 = 2.24, rounded half-up to 0.05 → 2.25 U
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::NONE, Some(&agreeing_algo()))
        .unwrap();
    assert!((r.amount - 2.25).abs() < EPS);
    assert_eq!(r.warning, WarningKind::Nominal);
    assert_eq!(r.capped_by, None);
    assert_eq!(r.breakdown.raw_rounded, 2.8);
}

#[test]
fn missing_reading_reduces_to_iob_and_cob() {
    let r = advisor()
        .recommend(
            &DoseContext {
                current_glucose: None,
                ..ctx()
            },
            AdjustmentFlags::NONE,
            Some(&agreeing_algo()),
        )
        .unwrap();
    assert!(r.breakdown.glucose_reading_missing);
    assert!((r.breakdown.raw - 1.0).abs() < EPS);
    assert!((r.amount - 0.8).abs() < EPS);
}

#[test]
fn superbolus_adds_borrowed_basal_to_unscaled_raw() {
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::super_bolus(), None)
        .unwrap();
    // raw 2.8 + 2 × 1.0 = 4.8, fraction bypassed
    assert!((r.amount - 4.8).abs() < EPS);
    assert_eq!(r.super_bolus_addend, Some(2.0));
}

#[test]
fn superbolus_exceeding_algorithm_is_not_flagged() {
    let low_algo = AlgorithmRecommendation {
        insulin_for_manual_bolus: 1.0,
        ..Default::default()
    };
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::super_bolus(), Some(&low_algo))
        .unwrap();
    assert!((r.amount - 4.8).abs() < EPS);
    assert_eq!(r.warning, WarningKind::Nominal);
}

#[test]
fn adjusted_dose_is_capped_at_max_bolus() {
    let r = advisor()
        .recommend(
            &DoseContext {
                carbs_on_board: 150.0, // cob term 15.0 pushes past the cap
                ..ctx()
            },
            AdjustmentFlags::NONE,
            None,
        )
        .unwrap();
    assert!((r.amount - 10.0).abs() < EPS);
    assert_eq!(r.capped_by, Some(CapReason::MaxBolus));
    // the computed need stays visible past the cap
    assert!(r.breakdown.raw_rounded > 10.0);
}

#[test]
fn zero_isf_is_a_hard_error() {
    let err = advisor()
        .recommend(
            &DoseContext { isf: 0.0, ..ctx() },
            AdjustmentFlags::NONE,
            None,
        )
        .unwrap_err();
    assert_eq!(err, AdvisorError::DivisionUndefined("isf"));
}

#[test]
fn local_amount_above_algorithm_requires_confirmation() {
    let low_algo = AlgorithmRecommendation {
        insulin_for_manual_bolus: 1.5,
        ..Default::default()
    };
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::NONE, Some(&low_algo))
        .unwrap();
    match r.warning {
        WarningKind::ExceedsAlgorithmRecommendation { algorithm_amount } => {
            assert!((algorithm_amount - 1.5).abs() < EPS);
        }
        other => panic!("expected exceeds warning, got {other:?}"),
    }
}

#[test]
fn nothing_to_deliver_on_either_side_is_not_recommended() {
    let zero_algo = AlgorithmRecommendation::default();
    let r = advisor()
        .recommend(
            &DoseContext {
                current_glucose: Some(80.0),
                carbs_on_board: 0.0,
                insulin_on_board: 1.5,
                fifteen_minute_delta: Some(-5.0),
                ..ctx()
            },
            AdjustmentFlags::NONE,
            Some(&zero_algo),
        )
        .unwrap();
    assert_eq!(r.amount, 0.0);
    assert_eq!(r.warning, WarningKind::NotRecommended);
}

#[test]
fn predictive_conflict_surfaces_when_dose_is_positive() {
    use bolus_core::PredictiveConflict;
    let algo = AlgorithmRecommendation {
        insulin_for_manual_bolus: 3.0,
        min_guard_glucose: 58.0,
        conflict_code: 1,
        ..Default::default()
    };
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::NONE, Some(&algo))
        .unwrap();
    assert_eq!(
        r.warning,
        WarningKind::Predictive(PredictiveConflict::GuardBelowThreshold)
    );
}

#[test]
fn no_algorithm_recommendation_yields_pending() {
    let r = advisor()
        .recommend(&ctx(), AdjustmentFlags::NONE, None)
        .unwrap();
    assert_eq!(r.warning, WarningKind::Pending);
    assert!((r.amount - 2.25).abs() < EPS);
}
