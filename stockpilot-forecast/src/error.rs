//! Fitting error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Series is degenerate: {distinct} distinct dates (need at least 2)")]
    DegenerateSeries { distinct: usize },

    #[error("Least-squares solve did not converge (design matrix too ill-conditioned)")]
    Singular,

    #[error("Fitted coefficients are not finite")]
    NonFinite,
}
