//! The assembled advisory engine and its type-state builder.

use std::marker::PhantomData;

use crate::adjustment::apply_adjustments;
use crate::calculator::compute_breakdown;
use crate::context::{
    AdjustmentFlags, AlgorithmRecommendation, CalculatorSettings, DoseContext, SafetyThresholds,
};
use crate::error::{AdvisorError, BuildError};
use crate::override_target::{OrefCurve, TargetCurve};
use crate::reconcile::{RecommendationResult, reconcile};

/// Pure, synchronous bolus advisor. Holds only configuration; every call
/// receives its own context snapshot, so it is safe to invoke re-entrantly
/// and from any thread.
pub struct BolusAdvisor {
    thresholds: SafetyThresholds,
    settings: CalculatorSettings,
    curve: Box<dyn TargetCurve + Send + Sync>,
}

impl core::fmt::Debug for BolusAdvisor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BolusAdvisor")
            .field("max_bolus_units", &self.thresholds.max_bolus_units)
            .field("fraction", &self.settings.fraction)
            .finish()
    }
}

impl BolusAdvisor {
    /// Start building an advisor.
    pub fn builder() -> AdvisorBuilder<Missing, Missing> {
        AdvisorBuilder::default()
    }

    pub fn thresholds(&self) -> &SafetyThresholds {
        &self.thresholds
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    /// Compute one recommendation: breakdown → adjustments → reconciliation.
    ///
    /// Pass `None` for `algorithm` while the predictive algorithm has not
    /// produced a recommendation yet; the result then carries
    /// `WarningKind::Pending` instead of a comparison.
    pub fn recommend(
        &self,
        ctx: &DoseContext,
        flags: AdjustmentFlags,
        algorithm: Option<&AlgorithmRecommendation>,
    ) -> Result<RecommendationResult, AdvisorError> {
        let breakdown = compute_breakdown(ctx)?;
        let adjusted =
            apply_adjustments(&breakdown, flags, &self.settings, ctx.current_basal_rate)?;
        Ok(reconcile(
            &adjusted,
            breakdown,
            flags,
            &self.thresholds,
            &self.settings,
            algorithm,
        ))
    }

    /// Map an intensity percentage to a temporary target glucose using the
    /// configured curve and half-basal anchor.
    pub fn percentage_to_target(
        &self,
        percentage: f64,
        profile_target: f64,
    ) -> Result<f64, AdvisorError> {
        self.curve
            .target_for_percentage(percentage, profile_target, self.settings.half_basal_target)
    }

    /// Inverse of [`BolusAdvisor::percentage_to_target`].
    pub fn target_to_percentage(
        &self,
        target: f64,
        profile_target: f64,
    ) -> Result<f64, AdvisorError> {
        self.curve
            .percentage_for_target(target, profile_target, self.settings.half_basal_target)
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `BolusAdvisor`. Thresholds and settings must be provided
/// before `build()` becomes available; `try_build()` is always available
/// for dynamic call sites.
pub struct AdvisorBuilder<T, S> {
    thresholds: Option<SafetyThresholds>,
    settings: Option<CalculatorSettings>,
    curve: Option<Box<dyn TargetCurve + Send + Sync>>,
    _t: PhantomData<T>,
    _s: PhantomData<S>,
}

impl Default for AdvisorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            thresholds: None,
            settings: None,
            curve: None,
            _t: PhantomData,
            _s: PhantomData,
        }
    }
}

impl<T, S> AdvisorBuilder<T, S> {
    pub fn with_thresholds(self, thresholds: SafetyThresholds) -> AdvisorBuilder<Set, S> {
        AdvisorBuilder {
            thresholds: Some(thresholds),
            settings: self.settings,
            curve: self.curve,
            _t: PhantomData,
            _s: PhantomData,
        }
    }

    pub fn with_settings(self, settings: CalculatorSettings) -> AdvisorBuilder<T, Set> {
        AdvisorBuilder {
            thresholds: self.thresholds,
            settings: Some(settings),
            curve: self.curve,
            _t: PhantomData,
            _s: PhantomData,
        }
    }

    /// Replace the default OpenAPS curve with a custom strategy.
    pub fn with_curve(mut self, curve: Box<dyn TargetCurve + Send + Sync>) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Dynamic build for call sites that cannot carry the type state.
    pub fn try_build(self) -> Result<BolusAdvisor, BuildError> {
        let thresholds = self.thresholds.ok_or(BuildError::MissingThresholds)?;
        let settings = self.settings.ok_or(BuildError::MissingSettings)?;
        validate(&thresholds, &settings)?;
        Ok(BolusAdvisor {
            thresholds,
            settings,
            curve: self.curve.unwrap_or_else(|| Box::new(OrefCurve)),
        })
    }
}

impl AdvisorBuilder<Set, Set> {
    pub fn build(self) -> Result<BolusAdvisor, BuildError> {
        self.try_build()
    }
}

fn validate(thresholds: &SafetyThresholds, settings: &CalculatorSettings) -> Result<(), BuildError> {
    if !(thresholds.max_bolus_units.is_finite() && thresholds.max_bolus_units > 0.0) {
        return Err(BuildError::InvalidSettings("max_bolus_units must be > 0"));
    }
    if !(thresholds.pump_increment_units.is_finite() && thresholds.pump_increment_units > 0.0) {
        return Err(BuildError::InvalidSettings(
            "pump_increment_units must be > 0",
        ));
    }
    if !(settings.fraction.is_finite() && settings.fraction > 0.0) {
        return Err(BuildError::InvalidSettings("fraction must be > 0"));
    }
    if !(settings.fatty_meal_factor.is_finite() && settings.fatty_meal_factor > 0.0) {
        return Err(BuildError::InvalidSettings("fatty_meal_factor must be > 0"));
    }
    if !(settings.sweet_meal_factor.is_finite() && settings.sweet_meal_factor >= 0.0) {
        return Err(BuildError::InvalidSettings("sweet_meal_factor must be >= 0"));
    }
    if !(settings.insulin_req_percentage.is_finite() && settings.insulin_req_percentage > 0.0) {
        return Err(BuildError::InvalidSettings(
            "insulin_req_percentage must be > 0",
        ));
    }
    Ok(())
}
