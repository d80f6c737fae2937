//! Design-matrix construction for the trend+seasonality decomposition.
//!
//! Each observed day becomes one row:
//!
//! ```text
//! [ 1, t, sin(2πkt/7)…, cos(2πkt/7)…, sin(2πkt/365.25)…, cos(2πkt/365.25)… ]
//! ```
//!
//! where `t` is the day offset from the first observation. The intercept and
//! linear term carry the trend; the Fourier pairs carry the seasonal shape.
//! Which pairs are present is decided per series (weekly needs more than two
//! weeks of history, yearly needs more than a year); a short series fitted
//! with a yearly basis would just memorize noise.

use std::f64::consts::PI;

/// Length of the weekly cycle in days.
const WEEKLY_PERIOD: f64 = 7.0;
/// Length of the yearly cycle in days (mean tropical year).
const YEARLY_PERIOD: f64 = 365.25;

/// Number of Fourier harmonics for the weekly component.
const WEEKLY_ORDER: usize = 3;
/// Number of Fourier harmonics for the yearly component.
const YEARLY_ORDER: usize = 10;

/// Which seasonal components participate in the fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonalSpec {
    pub weekly: bool,
    pub yearly: bool,
}

impl SeasonalSpec {
    /// Decide seasonality from the observed span in days.
    ///
    /// Weekly turns on above two weeks of history, yearly above one year.
    /// Intraday seasonality is never modelled; the series is already daily.
    pub fn from_span_days(span_days: i64) -> Self {
        Self {
            weekly: span_days > 14,
            yearly: span_days > 365,
        }
    }

    /// Total number of design-matrix columns for this spec.
    pub fn column_count(&self) -> usize {
        let mut cols = 2; // intercept + linear trend
        if self.weekly {
            cols += 2 * WEEKLY_ORDER;
        }
        if self.yearly {
            cols += 2 * YEARLY_ORDER;
        }
        cols
    }

    /// Fill one design-matrix row for day offset `t`.
    pub fn fill_row(&self, t: f64, row: &mut [f64]) {
        debug_assert_eq!(row.len(), self.column_count());
        row[0] = 1.0;
        row[1] = t;
        let mut idx = 2;
        if self.weekly {
            idx = fill_fourier(t, WEEKLY_PERIOD, WEEKLY_ORDER, row, idx);
        }
        if self.yearly {
            fill_fourier(t, YEARLY_PERIOD, YEARLY_ORDER, row, idx);
        }
    }
}

fn fill_fourier(t: f64, period: f64, order: usize, row: &mut [f64], mut idx: usize) -> usize {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * t / period;
        row[idx] = angle.sin();
        row[idx + 1] = angle.cos();
        idx += 2;
    }
    idx
}
