//! Per-call inputs of the advisory computation.
//!
//! Everything here is assembled fresh for each request and owned by the
//! caller; the engine keeps no state across calls.

use eyre::WrapErr;

use bolus_traits::{Clock, GlucoseHistory, TherapyLedger};

use crate::rounding::round_to_increment;
use crate::schedule::BasalSchedule;
use crate::trend::fifteen_minute_delta;
use crate::types::{GlucoseSample, GlucoseUnits};

/// Static therapy parameters from the active profile.
#[derive(Debug, Clone, Copy)]
pub struct TherapyProfile {
    /// Glucose units lowered per insulin unit.
    pub isf: f64,
    /// Grams of carbohydrate offset per insulin unit.
    pub carb_ratio: f64,
    /// Profile target glucose in the configured unit.
    pub target_glucose: f64,
    pub units: GlucoseUnits,
}

/// Snapshot of everything the dose arithmetic reads. `None` fields model
/// genuinely absent data (no CGM reading, not enough history, schedule gap);
/// zero is never used as a sentinel.
#[derive(Debug, Clone, Copy)]
pub struct DoseContext {
    pub current_glucose: Option<f64>,
    pub target_glucose: f64,
    pub isf: f64,
    pub carb_ratio: f64,
    pub insulin_on_board: f64,
    pub carbs_on_board: f64,
    pub current_basal_rate: Option<f64>,
    pub fifteen_minute_delta: Option<f64>,
    /// 1.0 for mg/dL, 0.0555 for mmol/L.
    pub conversion_factor: f64,
}

impl DoseContext {
    /// Build a context from the collaborator seams: glucose history, the
    /// insulin/carb ledger, and the basal schedule resolved at the current
    /// wall-clock time. Readings of zero are treated as "no reading".
    pub fn assemble(
        profile: &TherapyProfile,
        history: &dyn GlucoseHistory,
        ledger: &dyn TherapyLedger,
        schedule: &BasalSchedule,
        clock: &dyn Clock,
    ) -> crate::error::Result<Self> {
        let values = history
            .recent_values()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading glucose history")?;
        let samples: Vec<GlucoseSample> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| GlucoseSample {
                value,
                minutes_ago: (i as u32) * 5,
            })
            .collect();

        let current_glucose = samples.first().map(|s| s.value).filter(|&v| v > 0.0);
        let delta = fifteen_minute_delta(&samples);

        let insulin_on_board = ledger
            .insulin_on_board()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading insulin on board")?;
        let carbs_on_board = ledger
            .carbs_on_board()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading carbs on board")?;

        Ok(Self {
            current_glucose,
            target_glucose: profile.target_glucose,
            isf: profile.isf,
            carb_ratio: profile.carb_ratio,
            insulin_on_board,
            carbs_on_board,
            current_basal_rate: schedule.current_rate_at(clock),
            fifteen_minute_delta: delta,
            conversion_factor: profile.units.conversion_factor(),
        })
    }
}

/// Situational adjustment toggles. Fields are private: the constructors
/// guarantee that fatty-meal dampening and superbolus are never both set,
/// with fatty-meal taking precedence if a caller tries to force both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustmentFlags {
    fatty_meal: bool,
    super_bolus: bool,
}

impl AdjustmentFlags {
    pub const NONE: Self = Self {
        fatty_meal: false,
        super_bolus: false,
    };

    pub fn fatty_meal() -> Self {
        Self {
            fatty_meal: true,
            super_bolus: false,
        }
    }

    pub fn super_bolus() -> Self {
        Self {
            fatty_meal: false,
            super_bolus: true,
        }
    }

    /// Enable or disable fatty-meal dampening; enabling clears superbolus.
    pub fn with_fatty_meal(self, on: bool) -> Self {
        Self {
            fatty_meal: on,
            super_bolus: if on { false } else { self.super_bolus },
        }
    }

    /// Enable or disable superbolus; enabling clears fatty-meal dampening.
    pub fn with_super_bolus(self, on: bool) -> Self {
        Self {
            fatty_meal: if on { false } else { self.fatty_meal },
            super_bolus: on,
        }
    }

    /// Auto-enable the fatty-meal flag when (fat + protein) / total grams
    /// crosses the configured trigger ratio.
    pub fn from_meal_composition(
        fat_grams: f64,
        protein_grams: f64,
        total_grams: f64,
        trigger_ratio: f64,
    ) -> Self {
        if total_grams > 0.0 && (fat_grams + protein_grams) / total_grams >= trigger_ratio {
            Self::fatty_meal()
        } else {
            Self::NONE
        }
    }

    #[inline]
    pub fn fatty_meal_active(self) -> bool {
        self.fatty_meal
    }

    #[inline]
    pub fn super_bolus_active(self) -> bool {
        // fatty-meal wins if both were somehow requested
        self.super_bolus && !self.fatty_meal
    }
}

/// Device and guardrail limits supplied by pump/profile configuration.
#[derive(Debug, Clone, Copy)]
pub struct SafetyThresholds {
    pub max_bolus_units: f64,
    pub max_carbs_grams: f64,
    /// Smallest deliverable increment of the pump.
    pub pump_increment_units: f64,
    pub low_glucose_threshold: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            max_bolus_units: 10.0,
            max_carbs_grams: 250.0,
            pump_increment_units: 0.05,
            low_glucose_threshold: 65.0,
        }
    }
}

/// Tunables of the local calculator itself.
#[derive(Debug, Clone, Copy)]
pub struct CalculatorSettings {
    /// Global scaling fraction applied to the computed need.
    pub fraction: f64,
    /// Dampening multiplier for fatty meals.
    pub fatty_meal_factor: f64,
    /// (fat + protein) / total ratio that auto-enables the fatty-meal flag.
    pub fatty_meal_trigger: f64,
    /// Hours of basal a superbolus borrows.
    pub sweet_meal_factor: f64,
    /// Percentage applied to the algorithm's manual-bolus amount before
    /// comparison (100 = unscaled).
    pub insulin_req_percentage: f64,
    /// Half-basal anchor of the override-percentage curve, mg/dL.
    pub half_basal_target: f64,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            fraction: 0.8,
            fatty_meal_factor: 0.7,
            fatty_meal_trigger: 0.3,
            sweet_meal_factor: 2.0,
            insulin_req_percentage: 100.0,
            half_basal_target: 160.0,
        }
    }
}

/// Read-only recommendation from the external predictive algorithm.
/// Computed independently of the local calculator; the reconciler compares
/// the two and surfaces disagreement, it never merges them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmRecommendation {
    pub insulin_for_manual_bolus: f64,
    pub eventual_glucose: f64,
    pub min_guard_glucose: f64,
    pub min_predicted_glucose: f64,
    pub min_delta: f64,
    pub expected_delta: f64,
    /// 0 = no conflict; 1–6 are the predictive-mismatch reasons.
    pub conflict_code: u8,
}

impl AlgorithmRecommendation {
    /// The algorithm's amount after the caller's intensity percentage and
    /// pump-increment rounding, floored at zero. This is the number the
    /// local recommendation is compared against.
    pub fn scaled_amount(&self, insulin_req_percentage: f64, increment: f64) -> f64 {
        let scaled = if insulin_req_percentage == 100.0 {
            self.insulin_for_manual_bolus
        } else {
            self.insulin_for_manual_bolus * insulin_req_percentage / 100.0
        };
        round_to_increment(scaled.max(0.0), increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabling_one_flag_clears_the_other() {
        let f = AdjustmentFlags::super_bolus().with_fatty_meal(true);
        assert!(f.fatty_meal_active());
        assert!(!f.super_bolus_active());

        let f = AdjustmentFlags::fatty_meal().with_super_bolus(true);
        assert!(f.super_bolus_active());
        assert!(!f.fatty_meal_active());
    }

    #[test]
    fn disabling_does_not_resurrect() {
        let f = AdjustmentFlags::fatty_meal().with_fatty_meal(false);
        assert_eq!(f, AdjustmentFlags::NONE);
    }

    #[test]
    fn meal_composition_trigger() {
        // 40 g fat+protein of 100 g total, trigger at 0.3
        let f = AdjustmentFlags::from_meal_composition(25.0, 15.0, 100.0, 0.3);
        assert!(f.fatty_meal_active());
        let f = AdjustmentFlags::from_meal_composition(5.0, 5.0, 100.0, 0.3);
        assert_eq!(f, AdjustmentFlags::NONE);
        // empty meal never triggers
        let f = AdjustmentFlags::from_meal_composition(0.0, 0.0, 0.0, 0.3);
        assert_eq!(f, AdjustmentFlags::NONE);
    }

    #[test]
    fn algorithm_amount_is_scaled_and_rounded() {
        let algo = AlgorithmRecommendation {
            insulin_for_manual_bolus: 3.0,
            ..Default::default()
        };
        assert!((algo.scaled_amount(100.0, 0.05) - 3.0).abs() < 1e-9);
        assert!((algo.scaled_amount(50.0, 0.05) - 1.5).abs() < 1e-9);
        // negative algorithm amounts floor at zero
        let algo = AlgorithmRecommendation {
            insulin_for_manual_bolus: -0.4,
            ..Default::default()
        };
        assert_eq!(algo.scaled_amount(100.0, 0.05), 0.0);
    }
}
