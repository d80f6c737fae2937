//! Inventory risk evaluation.
//!
//! Derives replenishment signals per product from its demand velocity and
//! the stock level on its chronologically last row:
//!
//! - `safety_stock  = floor(avg_daily_demand × lead_time × 0.5)`
//! - `reorder_point = floor(avg_daily_demand × lead_time) + safety_stock`
//! - `days_left     = current_stock / avg_daily_demand`
//!
//! A product with no measurable velocity gets the 999-day sentinel instead
//! of a division by zero. Status classification is a strict priority chain:
//! an out-of-stock product is STOCKOUT no matter how its other numbers look.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cleaner::CanonicalRow;
use crate::stats::ProductStats;

/// Replenishment lead time in days, applied to every product.
/// A single fixed value is a known simplification; per-SKU lead times are a
/// future configuration point.
pub const LEAD_TIME_DAYS: f64 = 3.0;

/// Fraction of lead-time demand held as safety stock.
const SAFETY_STOCK_FACTOR: f64 = 0.5;

/// Days-of-stock below which a product is flagged for planned reordering.
const WARNING_DAYS: f64 = 7.0;

/// Sentinel for "no measurable velocity, effectively infinite runway".
const NO_VELOCITY_DAYS_LEFT: f64 = 999.0;

/// Urgency classification for one product's stock position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Stockout,
    Critical,
    Warning,
    Safe,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Stockout => write!(f, "STOCKOUT"),
            StockStatus::Critical => write!(f, "CRITICAL"),
            StockStatus::Warning => write!(f, "WARNING"),
            StockStatus::Safe => write!(f, "SAFE"),
        }
    }
}

impl StockStatus {
    /// The recommended action for this status.
    pub fn action(&self) -> &'static str {
        match self {
            StockStatus::Stockout => "Urgent Restock",
            StockStatus::Critical => "Order Now",
            StockStatus::Warning => "Plan Order",
            StockStatus::Safe => "Monitor",
        }
    }
}

/// One product's replenishment signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockSignal {
    pub product: String,
    pub status: StockStatus,
    pub action: String,
    /// Projected days of stock remaining, rounded to whole days.
    pub days_left: f64,
    pub current_stock: i64,
    pub reorder_point: i64,
}

/// Evaluate risk signals for every product with recorded statistics.
///
/// Preconditions are the caller's: both a product and a stock column must be
/// mapped, otherwise this stage is skipped entirely. Output follows the
/// statistics ranking; urgency ordering is the selector's job.
///
/// Products are independent, so the per-product work runs in parallel;
/// `collect` preserves the input ordering.
pub fn evaluate(rows: &[CanonicalRow], stats: &[ProductStats]) -> Vec<StockSignal> {
    stats
        .par_iter()
        .map(|s| {
            let current_stock = last_stock(rows, &s.product);
            classify(&s.product, current_stock, s.mean_quantity)
        })
        .collect()
}

/// Stock on the chronologically last row for `product` (0 when absent).
///
/// Later rows win date ties, matching the file's own ordering.
fn last_stock(rows: &[CanonicalRow], product: &str) -> f64 {
    let mut latest: Option<(chrono::NaiveDate, f64)> = None;
    for row in rows {
        if row.product.as_deref() != Some(product) {
            continue;
        }
        let stock = row.stock.unwrap_or(0.0);
        match latest {
            Some((date, _)) if row.date < date => {}
            _ => latest = Some((row.date, stock)),
        }
    }
    latest.map(|(_, stock)| stock).unwrap_or(0.0)
}

/// Build the signal for one product from its stock level and velocity.
fn classify(product: &str, current_stock: f64, avg_daily_demand: f64) -> StockSignal {
    let safety_stock = (avg_daily_demand * LEAD_TIME_DAYS * SAFETY_STOCK_FACTOR).floor() as i64;
    let reorder_point = (avg_daily_demand * LEAD_TIME_DAYS).floor() as i64 + safety_stock;

    let days_left = if avg_daily_demand > 0.0 {
        current_stock / avg_daily_demand
    } else {
        NO_VELOCITY_DAYS_LEFT
    };

    // Priority chain: first match wins.
    let status = if current_stock <= 0.0 {
        StockStatus::Stockout
    } else if current_stock < reorder_point as f64 {
        StockStatus::Critical
    } else if days_left < WARNING_DAYS {
        StockStatus::Warning
    } else {
        StockStatus::Safe
    };

    StockSignal {
        product: product.to_string(),
        status,
        action: status.action().to_string(),
        days_left: days_left.round(),
        current_stock: current_stock as i64,
        reorder_point,
    }
}
