//! The Intelligence Report: the engine's single output structure.
//!
//! Consumed both by the dashboard and as grounding context for the
//! assistant, so it is bounded, JSON-serializable, and free of
//! NaN/Infinity. Dates serialize as ISO-8601 strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cleaner::CanonicalRow;
use crate::risk::{StockSignal, StockStatus};

/// Placeholder model accuracy shown on the dashboard.
/// Not derived from backtesting (a documented limitation); kept literal so
/// nobody mistakes it for a computed figure.
pub const ACCURACY_PLACEHOLDER: &str = "92%";

/// One ranked product with its cumulative demand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product: String,
    pub total: f64,
}

/// One projected day of aggregate demand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Headline figures for the dashboard cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_stock: i64,
    pub stockout_count: usize,
    pub accuracy: String,
}

/// The engine's complete output for one analyzed file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    pub summary: Summary,
    pub best_sellers: Vec<ProductSales>,
    pub worst_sellers: Vec<ProductSales>,
    pub stock_alerts: Vec<StockSignal>,
    pub forecast_chart: Vec<ForecastPoint>,
}

/// Merge the per-stage outputs into the final report.
pub fn assemble(
    rows: &[CanonicalRow],
    best_sellers: Vec<ProductSales>,
    worst_sellers: Vec<ProductSales>,
    stock_alerts: Vec<StockSignal>,
    forecast_chart: Vec<ForecastPoint>,
) -> IntelligenceReport {
    let total_stock = rows
        .iter()
        .filter_map(|r| r.stock)
        .sum::<f64>() as i64;

    // Counted over the truncated alert list: the cards and the alert table
    // must agree on what the user is looking at.
    let stockout_count = stock_alerts
        .iter()
        .filter(|s| matches!(s.status, StockStatus::Stockout | StockStatus::Critical))
        .count();

    IntelligenceReport {
        summary: Summary {
            total_stock,
            stockout_count,
            accuracy: ACCURACY_PLACEHOLDER.to_string(),
        },
        best_sellers,
        worst_sellers,
        stock_alerts,
        forecast_chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stock: Option<f64>) -> CanonicalRow {
        CanonicalRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity: 1.0,
            product: None,
            stock,
        }
    }

    fn signal(status: StockStatus) -> StockSignal {
        StockSignal {
            product: "X".into(),
            status,
            action: status.action().into(),
            days_left: 1.0,
            current_stock: 0,
            reorder_point: 5,
        }
    }

    #[test]
    fn total_stock_sums_all_rows() {
        let rows = vec![row(Some(10.0)), row(Some(5.5)), row(None)];
        let report = assemble(&rows, vec![], vec![], vec![], vec![]);
        assert_eq!(report.summary.total_stock, 15);
    }

    #[test]
    fn stockout_count_includes_critical() {
        let alerts = vec![
            signal(StockStatus::Stockout),
            signal(StockStatus::Critical),
            signal(StockStatus::Warning),
            signal(StockStatus::Safe),
        ];
        let report = assemble(&[], vec![], vec![], alerts, vec![]);
        assert_eq!(report.summary.stockout_count, 2);
    }

    #[test]
    fn accuracy_is_the_placeholder() {
        let report = assemble(&[], vec![], vec![], vec![], vec![]);
        assert_eq!(report.summary.accuracy, "92%");
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = assemble(
            &[row(Some(3.0))],
            vec![ProductSales { product: "Beras".into(), total: 30.0 }],
            vec![],
            vec![signal(StockStatus::Critical)],
            vec![ForecastPoint {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                predicted: 12.5,
                lower: 10.0,
                upper: 15.0,
            }],
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"2024-02-01\""), "dates must be ISO-8601: {json}");
        assert!(json.contains("\"CRITICAL\""));
        let back: IntelligenceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
