use serde::Serialize;
use std::collections::HashMap;

use super::CsvCell;

/// One parsed CSV row: a mapping from column name to cell value.
pub type CsvRow = HashMap<String, CsvCell>;

/// A parsed CSV file: ordered column names and row mappings.
///
/// Column order follows the header line, duplicates preserved. Every row
/// carries a key for each declared column; short rows are padded with
/// empty text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// A table with no columns and no rows, produced from blank input.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}
