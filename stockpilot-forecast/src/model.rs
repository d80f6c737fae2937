//! The fitted demand model: linear trend plus Fourier seasonality.
//!
//! Fitting is one SVD least-squares solve over the observed daily series;
//! projection evaluates the fitted curve on future day offsets. Uncertainty
//! bounds are symmetric `±z·σ` bands where `σ` is the in-sample residual
//! standard deviation and `z = 1.28` (an 80% interval under a normal
//! residual assumption).

use chrono::{Duration, NaiveDate};
use nalgebra::{DMatrix, DVector};

use crate::design::SeasonalSpec;
use crate::error::FitError;
use crate::ols::solve_least_squares;

/// z-score for the 80% prediction interval.
const INTERVAL_Z: f64 = 1.28;

/// One projected day with its uncertainty band.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A fitted trend+seasonality model over a daily demand series.
#[derive(Clone, Debug)]
pub struct DemandModel {
    spec: SeasonalSpec,
    beta: DVector<f64>,
    origin: NaiveDate,
    last: NaiveDate,
    sigma: f64,
}

impl DemandModel {
    /// Fit the model to a daily series of `(date, total_quantity)` points.
    ///
    /// The series must hold one entry per distinct date. Which seasonal
    /// components participate is decided from the observed span; see
    /// [`SeasonalSpec::from_span_days`].
    pub fn fit(series: &[(NaiveDate, f64)]) -> Result<Self, FitError> {
        let mut dates: Vec<NaiveDate> = series.iter().map(|(d, _)| *d).collect();
        dates.sort();
        dates.dedup();
        if dates.len() < 2 {
            return Err(FitError::DegenerateSeries { distinct: dates.len() });
        }

        let origin = dates[0];
        let last = *dates.last().expect("non-empty by the check above");
        let span_days = (last - origin).num_days();
        let spec = SeasonalSpec::from_span_days(span_days);

        let n = series.len();
        let p = spec.column_count();
        let mut x = DMatrix::zeros(n, p);
        let mut y = DVector::zeros(n);
        let mut row = vec![0.0; p];
        for (i, (date, value)) in series.iter().enumerate() {
            let t = (*date - origin).num_days() as f64;
            spec.fill_row(t, &mut row);
            for (j, v) in row.iter().enumerate() {
                x[(i, j)] = *v;
            }
            y[i] = *value;
        }

        let beta = solve_least_squares(&x, &y).ok_or(FitError::Singular)?;

        let residuals = &y - &x * &beta;
        let sse: f64 = residuals.iter().map(|r| r * r).sum();
        // Degrees-of-freedom correction, clamped so short series with a wide
        // seasonal basis do not divide by zero.
        let dof = n.saturating_sub(p).max(1);
        let sigma = (sse / dof as f64).sqrt();
        if !sigma.is_finite() {
            return Err(FitError::NonFinite);
        }

        Ok(Self { spec, beta, origin, last, sigma })
    }

    /// Evaluate the fitted curve on an arbitrary date.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        let t = (date - self.origin).num_days() as f64;
        let mut row = vec![0.0; self.spec.column_count()];
        self.spec.fill_row(t, &mut row);
        row.iter().zip(self.beta.iter()).map(|(a, b)| a * b).sum()
    }

    /// Project `horizon` daily points beyond the last observed date.
    ///
    /// In-sample fitted values are not part of the output.
    pub fn project(&self, horizon: u32) -> Vec<Projection> {
        (1..=horizon as i64)
            .map(|offset| {
                let date = self.last + Duration::days(offset);
                let predicted = self.predict(date);
                Projection {
                    date,
                    predicted,
                    lower: predicted - INTERVAL_Z * self.sigma,
                    upper: predicted + INTERVAL_Z * self.sigma,
                }
            })
            .collect()
    }

    /// The seasonal components selected for this fit.
    pub fn spec(&self) -> SeasonalSpec {
        self.spec
    }

    /// In-sample residual standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}
