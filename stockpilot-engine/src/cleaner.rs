//! Type coercion and row filtering.
//!
//! Date and quantity are mandatory per row: a row failing either coercion is
//! dropped, not substituted. Stock is a lesser concern (it only feeds the
//! risk evaluator, never the forecaster), so an unparsable stock cell
//! becomes zero instead of costing us the row.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::ingest::RawTable;
use crate::normalizer::ColumnMap;

/// Minimum valid rows required for a reliable seasonal fit.
pub const MIN_VALID_ROWS: usize = 10;

/// Date formats accepted in merchant exports, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
];

/// One cleaned observation.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalRow {
    pub date: NaiveDate,
    pub quantity: f64,
    pub product: Option<String>,
    pub stock: Option<f64>,
}

/// Coerce the mapped columns, dropping rows with an unusable date or
/// quantity, and enforce the minimum-row floor.
pub fn clean(table: &RawTable, map: &ColumnMap) -> EngineResult<Vec<CanonicalRow>> {
    let mut rows = Vec::with_capacity(table.rows.len());

    for raw in &table.rows {
        let Some(date) = parse_date(&raw[map.date]) else {
            continue;
        };
        let Some(quantity) = parse_number(&raw[map.quantity]) else {
            continue;
        };

        let product = map.product.and_then(|idx| {
            let name = raw[idx].trim();
            (!name.is_empty()).then(|| name.to_string())
        });
        // Unparsable stock degrades to zero; the column being mapped at all
        // is what switches the risk evaluator on.
        let stock = map.stock.map(|idx| parse_number(&raw[idx]).unwrap_or(0.0));

        rows.push(CanonicalRow { date, quantity, product, stock });
    }

    if rows.len() < MIN_VALID_ROWS {
        return Err(EngineError::InsufficientData {
            rows: rows.len(),
            min: MIN_VALID_ROWS,
        });
    }

    Ok(rows)
}

/// Parse a calendar date, accepting a datetime by using its date part.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    // A timestamp like "2024-01-05 13:00:00" or "2024-01-05T13:00:00"
    // reduces to its first 10 characters for the date formats below.
    let date_part = if cell.len() > 10
        && (cell.as_bytes().get(10) == Some(&b' ') || cell.as_bytes().get(10) == Some(&b'T'))
    {
        &cell[..10]
    } else {
        cell
    };

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
