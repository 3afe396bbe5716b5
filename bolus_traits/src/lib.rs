pub mod clock;

pub use clock::{Clock, WallClock};

/// Provider of recent glucose readings, most-recent-first.
///
/// Values are in the caller's configured glucose unit (mg/dL or mmol/L);
/// the engine never converts between unit systems on its own.
pub trait GlucoseHistory {
    /// Recent glucose values ordered newest first, one per sampling interval.
    fn recent_values(&self) -> Result<Vec<f64>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Ledger of active insulin and unabsorbed carbohydrate.
pub trait TherapyLedger {
    /// Insulin still acting from prior doses, in insulin units.
    fn insulin_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
    /// Carbohydrate still to be absorbed, in grams.
    fn carbs_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}
