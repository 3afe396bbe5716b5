//! File- and argument-backed collaborator implementations.

use bolus_traits::{GlucoseHistory, TherapyLedger};

/// Glucose history loaded from the CSV file, newest first.
pub struct FileHistory {
    values: Vec<f64>,
}

impl FileHistory {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl GlucoseHistory for FileHistory {
    fn recent_values(&self) -> Result<Vec<f64>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.values.clone())
    }
}

/// IOB/COB taken straight from the command line.
pub struct ArgLedger {
    pub iob: f64,
    pub cob: f64,
}

impl TherapyLedger for ArgLedger {
    fn insulin_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.iob)
    }

    fn carbs_on_board(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.cob)
    }
}
