//! Raw CSV ingestion.
//!
//! Reads the uploaded bytes into an untyped table: free-form headers plus
//! string cells. No interpretation happens here; header mapping belongs to
//! the normalizer and type coercion to the cleaning stage.

use std::io::Read;

use crate::error::EngineResult;

/// An uninterpreted CSV table.
#[derive(Clone, Debug)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a raw table from any reader.
///
/// Rows shorter than the header are padded with empty cells rather than
/// rejected; merchant exports routinely drop trailing columns.
pub fn read_table<R: Read>(reader: R) -> EngineResult<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let width = headers.len();
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}
