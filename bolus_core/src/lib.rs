#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Bolus dose advisory engine (pure, synchronous, I/O-free).
//!
//! Advises how many insulin units to deliver for a meal or correction
//! event and classifies whether the advice is safe to apply without extra
//! confirmation. All inputs arrive as an immutable per-call snapshot; the
//! engine holds no mutable state and never blocks.
//!
//! ## Architecture
//!
//! - **Trend**: 15-minute glucose delta from recent history (`trend`)
//! - **Schedule**: active basal-rate resolution (`schedule`)
//! - **Calculator**: partial insulin terms and the raw need (`calculator`)
//! - **Adjustment**: fatty-meal / superbolus / scaling fraction (`adjustment`)
//! - **Reconciliation**: clamping, increment rounding, and the comparison
//!   against the external predictive algorithm (`reconcile`)
//! - **Override mapping**: intensity percentage ⇄ temporary target
//!   (`override_target`)
//!
//! Data flows strictly upward: trend and schedule feed the calculator,
//! the calculator feeds adjustment, adjustment feeds reconciliation. The
//! override mapper is independent and stateless.

pub mod adjustment;
pub mod advisor;
pub mod calculator;
pub mod context;
pub mod conversions;
pub mod error;
pub mod mocks;
pub mod override_target;
pub mod reconcile;
pub mod rounding;
pub mod schedule;
pub mod trend;
pub mod types;

pub use adjustment::{AdjustedDose, apply_adjustments};
pub use advisor::{AdvisorBuilder, BolusAdvisor};
pub use calculator::{DoseBreakdown, compute_breakdown};
pub use context::{
    AdjustmentFlags, AlgorithmRecommendation, CalculatorSettings, DoseContext, SafetyThresholds,
    TherapyProfile,
};
pub use conversions::schedule_from_entries;
pub use error::{AdvisorError, BuildError};
pub use override_target::{
    MAX_PERCENTAGE, MIN_PERCENTAGE, OrefCurve, TargetCurve, map_percentage_to_target,
    map_target_to_percentage,
};
pub use reconcile::{
    CapReason, PredictiveConflict, RecommendationResult, WarningKind, reconcile,
};
pub use rounding::{round2, round_to_increment};
pub use schedule::{BasalSchedule, BasalSegment};
pub use trend::{TREND_SAMPLES, fifteen_minute_delta};
pub use types::{GlucoseSample, GlucoseUnits, TimeOfDay};
