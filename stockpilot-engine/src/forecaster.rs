//! Demand forecasting over the aggregate daily series.
//!
//! All products are summed into one daily demand series; the decomposition
//! model in `stockpilot-forecast` handles trend and seasonality selection
//! from the observed span. Only out-of-sample projections are returned;
//! in-sample fitted values never reach the response.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use stockpilot_forecast::DemandModel;

use crate::cleaner::CanonicalRow;
use crate::error::EngineResult;
use crate::report::ForecastPoint;

/// Sum quantity per date across all products.
///
/// The BTreeMap keeps the series date-ordered, which the fitter relies on
/// for its span calculation.
pub fn aggregate_daily(rows: &[CanonicalRow]) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        *by_date.entry(row.date).or_insert(0.0) += row.quantity;
    }
    by_date.into_iter().collect()
}

/// Fit the seasonal model and project `horizon` days past the last
/// observation.
pub fn forecast(rows: &[CanonicalRow], horizon: u32) -> EngineResult<Vec<ForecastPoint>> {
    let series = aggregate_daily(rows);
    let model = DemandModel::fit(&series)?;

    log::debug!(
        "fitted demand model: weekly={} yearly={} sigma={:.3}",
        model.spec().weekly,
        model.spec().yearly,
        model.sigma()
    );

    Ok(model
        .project(horizon)
        .into_iter()
        .map(|p| ForecastPoint {
            date: p.date,
            predicted: p.predicted,
            lower: p.lower,
            upper: p.upper,
        })
        .collect())
}
