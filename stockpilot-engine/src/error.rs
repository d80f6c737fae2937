//! Engine error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.
//! Pipeline errors abort the whole request: a partial report (say, a
//! forecast without its risk signals) could mislead a reorder decision,
//! so the report is all-or-nothing.

use stockpilot_forecast::FitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A mandatory canonical column could not be identified in the headers.
    #[error("CSV must contain a {field} column (e.g. {examples})")]
    Schema {
        field: &'static str,
        examples: &'static str,
    },

    /// Too few rows survived cleaning for the seasonal fit to be reliable.
    #[error("Data history too short: {rows} valid rows, need at least {min}")]
    InsufficientData { rows: usize, min: usize },

    /// The requested horizon is outside the supported range.
    #[error("Forecast horizon {horizon} is out of range (1..={max})")]
    InvalidHorizon { horizon: u32, max: u32 },

    /// The forecaster could not fit the aggregated series.
    #[error("Forecast analysis failed: {0}")]
    Analysis(#[from] FitError),

    /// The input bytes could not be read as CSV at all.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    /// Whether the caller can fix this by correcting their input.
    ///
    /// Schema, data-volume, and horizon problems are the user's to fix;
    /// a fit failure on well-formed input is ours.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EngineError::Analysis(_))
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
