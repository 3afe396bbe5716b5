//! Canned collaborator implementations for tests and simulations.

use bolus_traits::{GlucoseHistory, TherapyLedger};

/// Fixed glucose history, newest first.
#[derive(Debug, Clone, Default)]
pub struct CannedHistory(pub Vec<f64>);

impl GlucoseHistory for CannedHistory {
    fn recent_values(&self) -> Result<Vec<f64>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.clone())
    }
}

/// Fixed insulin/carb ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedLedger {
    pub iob: f64,
    pub cob: f64,
}

impl TherapyLedger for CannedLedger {
    fn insulin_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.iob)
    }

    fn carbs_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.cob)
    }
}
