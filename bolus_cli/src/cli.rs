use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bolus advisory CLI: one-shot dose recommendations and override-target
/// mapping against a TOML therapy config.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the therapy config TOML
    #[arg(short, long, default_value = "bolus.toml")]
    pub config: PathBuf,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a dose recommendation for the current situation
    Advise(AdviseArgs),
    /// Map an override intensity percentage to a temporary target, or back
    Override(OverrideArgs),
}

#[derive(Args, Debug)]
pub struct AdviseArgs {
    /// Glucose history CSV (headers: minutes_ago,glucose), newest need not
    /// be first; rows are ordered on load
    #[arg(long)]
    pub glucose: PathBuf,

    /// Insulin on board, units
    #[arg(long, default_value_t = 0.0)]
    pub iob: f64,

    /// Carbs on board, grams
    #[arg(long, default_value_t = 0.0)]
    pub cob: f64,

    /// Predictive-algorithm suggestion JSON; omit while none is available
    #[arg(long)]
    pub suggestion: Option<PathBuf>,

    /// Force the fatty-meal dampening flag
    #[arg(long, conflicts_with = "superbolus")]
    pub fatty: bool,

    /// Force the superbolus flag
    #[arg(long)]
    pub superbolus: bool,

    /// Meal fat grams (for the automatic fatty-meal trigger)
    #[arg(long, default_value_t = 0.0)]
    pub fat: f64,

    /// Meal protein grams (for the automatic fatty-meal trigger)
    #[arg(long, default_value_t = 0.0)]
    pub protein: f64,

    /// Total meal grams (for the automatic fatty-meal trigger)
    #[arg(long, default_value_t = 0.0)]
    pub meal_grams: f64,
}

#[derive(Args, Debug)]
pub struct OverrideArgs {
    /// Intensity percentage to map to a temporary target
    #[arg(long, conflicts_with = "target")]
    pub percentage: Option<f64>,

    /// Temporary target to map back to an intensity percentage
    #[arg(long)]
    pub target: Option<f64>,
}
