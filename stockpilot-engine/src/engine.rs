//! End-to-end pipeline orchestration.
//!
//! Stage order: ingest → normalize → clean → {statistics, risk} → forecast →
//! assemble. Stages are sequential because each consumes the previous
//! stage's cleaned data. A request either completes with a full report or
//! fails atomically: no stage output survives a later stage's error.

use crate::cleaner;
use crate::error::{EngineError, EngineResult};
use crate::forecaster;
use crate::ingest;
use crate::normalizer::ColumnMap;
use crate::report::{self, IntelligenceReport};
use crate::risk;
use crate::selector::{Selector, UrgencySelector};
use crate::stats;

/// Largest accepted forecast horizon, in days.
/// Unbounded horizons strain the fit far beyond its information content.
pub const MAX_HORIZON_DAYS: u32 = 365;

/// Analyze an uploaded sales CSV and produce the Intelligence Report.
///
/// `horizon` is the number of future days to forecast past the last
/// observed date; values outside `1..=365` are rejected up front.
pub fn analyze_csv(bytes: &[u8], horizon: u32) -> EngineResult<IntelligenceReport> {
    if horizon == 0 || horizon > MAX_HORIZON_DAYS {
        return Err(EngineError::InvalidHorizon { horizon, max: MAX_HORIZON_DAYS });
    }

    let table = ingest::read_table(bytes)?;
    let map = ColumnMap::detect(&table.headers)?;
    let rows = cleaner::clean(&table, &map)?;

    log::info!(
        "analyzing {} rows (product column: {}, stock column: {})",
        rows.len(),
        map.product.is_some(),
        map.stock.is_some()
    );

    let product_stats = stats::compute(&rows);
    let best = stats::best_sellers(&product_stats);
    let worst = stats::worst_sellers(&product_stats);

    // Risk signals need both a product identity and a stock level; with
    // either missing the engine degrades to forecast-only mode.
    let alerts = if map.product.is_some() && map.stock.is_some() {
        let signals = risk::evaluate(&rows, &product_stats);
        UrgencySelector::default().select(signals)
    } else {
        Vec::new()
    };

    let chart = forecaster::forecast(&rows, horizon)?;

    Ok(report::assemble(&rows, best, worst, alerts, chart))
}
