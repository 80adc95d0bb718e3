use serde::Serialize;

use crate::domain::csv::CsvRow;

/// Provenance metadata for one merged report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    /// Base directory the report was built from.
    pub base_dir: String,

    /// Trimmed folder-name keyword.
    pub start_keyword: String,

    /// Names of the matched immediate subdirectories, in listing order.
    pub matched_folders: Vec<String>,

    /// Number of CSV files merged.
    pub csv_count: usize,

    /// Total row count across all files.
    pub row_count: usize,

    /// Number of distinct column names.
    pub col_count: usize,
}

/// The merged dataset built from every CSV file under the matched folders.
///
/// `headers` is the union of all column names in first-seen order with
/// duplicates collapsed. Rows keep only the keys their source file
/// declared, so files with fewer columns produce rows without the
/// union-only keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedReport {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub meta: ReportMeta,
}
