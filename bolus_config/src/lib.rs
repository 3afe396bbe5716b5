#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and glucose-history parsing for the bolus advisory system.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Glucose CSV loader enforces headers and orders samples newest-first
//!   before they reach the trend estimator.

use serde::Deserialize;

/// Glucose history CSV schema.
///
/// Expected headers:
/// minutes_ago,glucose
///
/// Example:
/// minutes_ago,glucose
/// 0,180
/// 5,176
/// 10,173
/// 15,170
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GlucoseRow {
    pub minutes_ago: u32,
    pub glucose: f64,
}

/// Glucose unit system. Drives the single mg/dL⇄mmol/L conversion factor
/// the engine is told to use; no other unit policy lives anywhere.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Mgdl,
    Mmol,
}

#[derive(Debug, Deserialize)]
pub struct Therapy {
    /// Insulin sensitivity factor: glucose units lowered per insulin unit.
    pub isf: f64,
    /// Grams of carbohydrate offset per insulin unit.
    pub carb_ratio: f64,
    #[serde(default)]
    pub units: Units,
    /// Profile target glucose in the configured unit.
    pub target_glucose: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Safety {
    pub max_bolus_units: f64,
    pub max_carbs_grams: f64,
    /// Smallest deliverable increment of the pump.
    pub pump_increment_units: f64,
    /// Glucose below this is treated as a predicted low by the caller.
    pub low_glucose_threshold: f64,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            max_bolus_units: 10.0,
            max_carbs_grams: 250.0,
            pump_increment_units: 0.05,
            low_glucose_threshold: 65.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Calculator {
    /// Global scaling fraction applied to the computed need (typical 0.1–1.2).
    pub fraction: f64,
    /// Allow the fatty-meal dampening toggle at all.
    pub fatty_meals: bool,
    /// Dampening multiplier applied when the fatty-meal flag is set.
    pub fatty_meal_factor: f64,
    /// (fat + protein) / total-grams ratio above which the fatty-meal flag
    /// is enabled automatically.
    pub fatty_meal_trigger: f64,
    /// Allow the superbolus toggle at all.
    pub sweet_meals: bool,
    /// Hours of basal borrowed by a superbolus.
    pub sweet_meal_factor: f64,
    /// Percentage applied to the external algorithm's manual-bolus amount
    /// before comparison (100 = unscaled).
    pub insulin_req_percentage: f64,
    /// Half-basal anchor for the override-percentage curve, mg/dL.
    pub half_basal_target: f64,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            fraction: 0.8,
            fatty_meals: false,
            fatty_meal_factor: 0.7,
            fatty_meal_trigger: 0.3,
            sweet_meals: false,
            sweet_meal_factor: 2.0,
            insulin_req_percentage: 100.0,
            half_basal_target: 160.0,
        }
    }
}

/// One segment of the piecewise basal-rate schedule.
#[derive(Debug, Deserialize, Clone)]
pub struct BasalEntry {
    /// Segment start as "HH:MM" time-of-day.
    pub start: String,
    /// Basal rate in insulin units per hour.
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub therapy: Therapy,
    #[serde(default)]
    pub safety: Safety,
    #[serde(default)]
    pub calculator: Calculator,
    #[serde(default)]
    pub basal: Vec<BasalEntry>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Parse "HH:MM" into seconds since midnight.
pub fn parse_start(s: &str) -> eyre::Result<u32> {
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| eyre::eyre!("basal start {s:?} is not HH:MM"))?;
    let h: u32 = h
        .parse()
        .map_err(|_| eyre::eyre!("basal start {s:?}: bad hour"))?;
    let m: u32 = m
        .parse()
        .map_err(|_| eyre::eyre!("basal start {s:?}: bad minute"))?;
    if h > 23 || m > 59 {
        eyre::bail!("basal start {s:?} out of range");
    }
    Ok(h * 3600 + m * 60)
}

/// Validate a loaded config before it is bridged into core types.
pub fn validate(cfg: &Config) -> eyre::Result<()> {
    let t = &cfg.therapy;
    if !t.isf.is_finite() || t.isf <= 0.0 {
        eyre::bail!("therapy.isf must be finite and > 0, got {}", t.isf);
    }
    if !t.carb_ratio.is_finite() || t.carb_ratio <= 0.0 {
        eyre::bail!(
            "therapy.carb_ratio must be finite and > 0, got {}",
            t.carb_ratio
        );
    }
    if !t.target_glucose.is_finite() || t.target_glucose <= 0.0 {
        eyre::bail!(
            "therapy.target_glucose must be finite and > 0, got {}",
            t.target_glucose
        );
    }

    let s = &cfg.safety;
    if !(s.max_bolus_units.is_finite() && s.max_bolus_units > 0.0) {
        eyre::bail!("safety.max_bolus_units must be > 0");
    }
    if !(s.pump_increment_units.is_finite() && s.pump_increment_units > 0.0) {
        eyre::bail!("safety.pump_increment_units must be > 0");
    }
    if !(s.max_carbs_grams.is_finite() && s.max_carbs_grams > 0.0) {
        eyre::bail!("safety.max_carbs_grams must be > 0");
    }
    if !(s.low_glucose_threshold.is_finite() && s.low_glucose_threshold >= 0.0) {
        eyre::bail!("safety.low_glucose_threshold must be >= 0");
    }

    let c = &cfg.calculator;
    if !(c.fraction.is_finite() && c.fraction > 0.0 && c.fraction <= 2.0) {
        eyre::bail!("calculator.fraction must be in (0, 2], got {}", c.fraction);
    }
    if !(c.fatty_meal_factor.is_finite() && c.fatty_meal_factor > 0.0 && c.fatty_meal_factor <= 1.0)
    {
        eyre::bail!(
            "calculator.fatty_meal_factor must be in (0, 1], got {}",
            c.fatty_meal_factor
        );
    }
    if !(c.fatty_meal_trigger.is_finite()
        && c.fatty_meal_trigger > 0.0
        && c.fatty_meal_trigger < 1.0)
    {
        eyre::bail!(
            "calculator.fatty_meal_trigger must be in (0, 1), got {}",
            c.fatty_meal_trigger
        );
    }
    if !(c.sweet_meal_factor.is_finite() && c.sweet_meal_factor >= 0.0) {
        eyre::bail!("calculator.sweet_meal_factor must be >= 0");
    }
    if !(c.insulin_req_percentage.is_finite() && c.insulin_req_percentage > 0.0) {
        eyre::bail!("calculator.insulin_req_percentage must be > 0");
    }
    if !(c.half_basal_target.is_finite() && c.half_basal_target > 100.0) {
        eyre::bail!(
            "calculator.half_basal_target must be > 100 mg/dL, got {}",
            c.half_basal_target
        );
    }

    validate_basal(&cfg.basal)?;
    Ok(())
}

/// Basal schedule rules: entries sorted by start, strictly increasing,
/// first entry at midnight, all rates finite and non-negative.
pub fn validate_basal(entries: &[BasalEntry]) -> eyre::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let mut prev: Option<u32> = None;
    for (i, e) in entries.iter().enumerate() {
        let start = parse_start(&e.start)?;
        if i == 0 && start != 0 {
            eyre::bail!("first basal entry must start at 00:00, got {:?}", e.start);
        }
        if let Some(p) = prev
            && start <= p
        {
            eyre::bail!(
                "basal entries must be strictly increasing by start time (entry {i} at {:?})",
                e.start
            );
        }
        if !e.rate.is_finite() || e.rate < 0.0 {
            eyre::bail!("basal entry {i} rate must be finite and >= 0, got {}", e.rate);
        }
        prev = Some(start);
    }
    Ok(())
}

/// Predictive-algorithm suggestion as emitted by the external oref-style
/// service, reduced to the fields the reconciler reads.
///
/// `conflict_code` 0 means no predictive mismatch; 1–6 are the literal
/// mismatch reasons of the algorithm's manual-bolus error channel.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct Suggestion {
    pub insulin_for_manual_bolus: f64,
    pub eventual_glucose: f64,
    pub min_guard_glucose: f64,
    pub min_predicted_glucose: f64,
    pub min_delta: f64,
    pub expected_delta: f64,
    pub conflict_code: u8,
}

pub fn load_suggestion_json(text: &str) -> eyre::Result<Suggestion> {
    serde_json::from_str::<Suggestion>(text)
        .map_err(|e| eyre::eyre!("suggestion JSON: {e}"))
}

/// Load glucose history rows from CSV text with enforced headers, returning
/// values ordered newest-first (ascending `minutes_ago`).
pub fn load_glucose_csv(text: &str) -> eyre::Result<Vec<GlucoseRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 || &headers[0] != "minutes_ago" || &headers[1] != "glucose" {
        eyre::bail!(
            "glucose CSV must have headers 'minutes_ago,glucose', got {:?}",
            headers
        );
    }

    let mut rows: Vec<GlucoseRow> = Vec::new();
    for rec in rdr.deserialize::<GlucoseRow>() {
        let row = rec?;
        if !row.glucose.is_finite() || row.glucose < 0.0 {
            eyre::bail!(
                "glucose CSV row has invalid reading {} at {} minutes ago",
                row.glucose,
                row.minutes_ago
            );
        }
        rows.push(row);
    }
    rows.sort_by_key(|r| r.minutes_ago);
    Ok(rows)
}
