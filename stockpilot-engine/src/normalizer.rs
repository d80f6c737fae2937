//! Flexible column mapping.
//!
//! Merchant CSV exports carry inconsistent, locale-mixed headers (Indonesian
//! and English in the same file), so a rigid expected-header contract would
//! reject most real uploads. Instead, every header is lower-cased and
//! trimmed, and each canonical target claims the first column whose name
//! contains one of its keywords.
//!
//! Binding rules:
//! - Targets are tried in fixed priority order: date, quantity, product,
//!   stock. For each target the keyword list is scanned in order, and for
//!   each keyword the columns in their original order.
//! - A source column binds to at most one target. Once claimed it is
//!   invisible to later targets, so one column can never satisfy two.
//! - Date and quantity are mandatory; product and stock are optional.

use crate::error::{EngineError, EngineResult};

/// Keywords recognized for the date column, most specific first.
const DATE_KEYWORDS: &[&str] = &["ds", "tanggal", "date", "time", "waktu"];
/// Keywords recognized for the quantity column.
const QUANTITY_KEYWORDS: &[&str] =
    &["y", "terjual", "sales", "quantity", "qty", "penjualan", "amount"];
/// Keywords recognized for the product column.
const PRODUCT_KEYWORDS: &[&str] =
    &["product", "produk", "nama", "item", "sku", "barang", "name"];
/// Keywords recognized for the stock column.
const STOCK_KEYWORDS: &[&str] = &["stock", "sisa", "stok", "inventory", "available"];

/// Indices of the canonical columns inside a raw table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub quantity: usize,
    pub product: Option<usize>,
    pub stock: Option<usize>,
}

impl ColumnMap {
    /// Identify the canonical columns among free-form headers.
    pub fn detect(headers: &[String]) -> EngineResult<Self> {
        let lowered: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut claimed = vec![false; lowered.len()];

        let date = claim(&lowered, &mut claimed, DATE_KEYWORDS);
        let quantity = claim(&lowered, &mut claimed, QUANTITY_KEYWORDS);
        let product = claim(&lowered, &mut claimed, PRODUCT_KEYWORDS);
        let stock = claim(&lowered, &mut claimed, STOCK_KEYWORDS);

        let date = date.ok_or(EngineError::Schema {
            field: "date",
            examples: "'tanggal' or 'date'",
        })?;
        let quantity = quantity.ok_or(EngineError::Schema {
            field: "quantity",
            examples: "'terjual' or 'sales'",
        })?;

        Ok(Self { date, quantity, product, stock })
    }
}

/// Bind the first unclaimed column matching any keyword, keyword-major.
fn claim(lowered: &[String], claimed: &mut [bool], keywords: &[&str]) -> Option<usize> {
    for keyword in keywords {
        for (idx, header) in lowered.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            if header.contains(keyword) {
                claimed[idx] = true;
                return Some(idx);
            }
        }
    }
    None
}
