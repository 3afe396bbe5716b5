//! Override-percentage ⇄ temporary-target mapping.
//!
//! A single delivery-intensity percentage (100 = no change) is translated
//! into an equivalent temporary glucose target and back. The curve is
//! pluggable; the default reproduces the OpenAPS half-basal formula,
//! anchored so that delivery is halved at the configured half-basal target
//! (160 mg/dL by default).

use crate::error::AdvisorError;

/// Lowest meaningful intensity percentage.
pub const MIN_PERCENTAGE: f64 = 15.0;
/// Highest meaningful intensity percentage.
pub const MAX_PERCENTAGE: f64 = 200.0;

/// Strategy seam for the percentage⇄target curve.
///
/// Contract: `target_for_percentage(100, t, _) == t`; target decreases
/// monotonically as the percentage rises past 100 and increases below it;
/// the inverse round-trips the forward mapping within rounding tolerance.
pub trait TargetCurve {
    fn target_for_percentage(
        &self,
        percentage: f64,
        profile_target: f64,
        half_basal_target: f64,
    ) -> Result<f64, AdvisorError>;

    fn percentage_for_target(
        &self,
        target: f64,
        profile_target: f64,
        half_basal_target: f64,
    ) -> Result<f64, AdvisorError>;
}

/// The OpenAPS curve: with `c = half_basal_target − profile_target` and
/// `ratio = percentage / 100`,
///
/// `target = c / ratio − c + profile_target`
///
/// At `target == half_basal_target` the ratio is exactly 0.5 (delivery
/// halved); at 100 % the target is exactly the profile target.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrefCurve;

fn half_basal_offset(
    profile_target: f64,
    half_basal_target: f64,
) -> Result<f64, AdvisorError> {
    if !profile_target.is_finite() {
        return Err(AdvisorError::NonFiniteInput("profile_target"));
    }
    if !half_basal_target.is_finite() {
        return Err(AdvisorError::NonFiniteInput("half_basal_target"));
    }
    let c = half_basal_target - profile_target;
    if c <= 0.0 {
        // the curve degenerates unless the half-basal anchor sits above
        // the profile target
        return Err(AdvisorError::DivisionUndefined("half_basal_offset"));
    }
    Ok(c)
}

impl TargetCurve for OrefCurve {
    fn target_for_percentage(
        &self,
        percentage: f64,
        profile_target: f64,
        half_basal_target: f64,
    ) -> Result<f64, AdvisorError> {
        if !percentage.is_finite() {
            return Err(AdvisorError::NonFiniteInput("percentage"));
        }
        let c = half_basal_offset(profile_target, half_basal_target)?;
        let ratio = percentage.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE) / 100.0;
        Ok(c / ratio - c + profile_target)
    }

    fn percentage_for_target(
        &self,
        target: f64,
        profile_target: f64,
        half_basal_target: f64,
    ) -> Result<f64, AdvisorError> {
        if !target.is_finite() {
            return Err(AdvisorError::NonFiniteInput("target"));
        }
        let c = half_basal_offset(profile_target, half_basal_target)?;
        let denominator = target + c - profile_target;
        if denominator <= 0.0 {
            return Err(AdvisorError::DivisionUndefined("target_offset"));
        }
        let ratio = c / denominator;
        Ok((ratio * 100.0).clamp(MIN_PERCENTAGE, MAX_PERCENTAGE))
    }
}

/// Map an intensity percentage to a temporary target with the default curve.
pub fn map_percentage_to_target(
    percentage: f64,
    profile_target: f64,
    half_basal_target: f64,
) -> Result<f64, AdvisorError> {
    OrefCurve.target_for_percentage(percentage, profile_target, half_basal_target)
}

/// Inverse of [`map_percentage_to_target`] with the default curve.
pub fn map_target_to_percentage(
    target: f64,
    profile_target: f64,
    half_basal_target: f64,
) -> Result<f64, AdvisorError> {
    OrefCurve.percentage_for_target(target, profile_target, half_basal_target)
}
