use thiserror::Error;

/// Hard failures of the advisory computation. Everything else (insufficient
/// trend history, missing glucose reading, algorithm disagreement) is a
/// business-rule outcome carried in `WarningKind`/`DoseBreakdown`, never an
/// error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// A divisor the arithmetic depends on is zero.
    #[error("division undefined: {0} is zero")]
    DivisionUndefined(&'static str),
    /// An input is NaN or infinite.
    #[error("non-finite input: {0}")]
    NonFiniteInput(&'static str),
    /// Superbolus was requested but no basal segment covers the current
    /// time of day, so the addend cannot be sized.
    #[error("no basal rate available for the superbolus addend")]
    BasalScheduleGap,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing safety thresholds")]
    MissingThresholds,
    #[error("missing calculator settings")]
    MissingSettings,
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
