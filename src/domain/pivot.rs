// ============================================================
// PIVOT DOMAIN TYPES
// ============================================================
// Pivot specification and result table

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::csv::CsvCell;
use crate::domain::error::{AppError, Result};

/// Aggregation function applied to each pivot bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    #[default]
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

/// Optional renaming of one column's values, applied before pivoting.
///
/// Values absent from the mapping pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMapping {
    pub column: String,
    pub mapping: HashMap<String, String>,
}

/// How to pivot a merged report: which fields become values, row index
/// and column headers, and how buckets are aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PivotSpec {
    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub index: Vec<String>,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub aggfunc: AggFunc,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupMapping>,
}

impl PivotSpec {
    /// Check the spec against the headers of the report it will pivot.
    ///
    /// `values` and `index` must be non-empty, the three buckets must be
    /// pairwise disjoint, and every named field (including the grouping
    /// column) must exist in the report.
    pub fn validate(&self, headers: &[String]) -> Result<()> {
        if self.values.is_empty() {
            return Err(AppError::InvalidInput(
                "pivot spec requires at least one values field".to_string(),
            ));
        }
        if self.index.is_empty() {
            return Err(AppError::InvalidInput(
                "pivot spec requires at least one index field".to_string(),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for field in self
            .values
            .iter()
            .chain(self.index.iter())
            .chain(self.columns.iter())
        {
            if !seen.insert(field.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "field '{}' appears in more than one pivot bucket",
                    field
                )));
            }
        }

        let known: HashSet<&str> = headers.iter().map(String::as_str).collect();
        for field in seen.iter() {
            if !known.contains(field) {
                return Err(AppError::InvalidInput(format!(
                    "pivot field '{}' is not a column of the report",
                    field
                )));
            }
        }

        if let Some(groups) = &self.groups {
            if !known.contains(groups.column.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "grouping column '{}' is not a column of the report",
                    groups.column
                )));
            }
        }

        Ok(())
    }
}

/// The result of a pivot computation: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CsvCell>>,
}

impl PivotTable {
    /// Render as CSV text: comma-separated, double-quote escaping for
    /// fields containing commas, quotes, or line breaks.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&render_csv_line(
            &self.headers.iter().map(String::as_str).collect::<Vec<_>>(),
        ));
        out.push('\n');
        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            out.push_str(&render_csv_line(
                &fields.iter().map(String::as_str).collect::<Vec<_>>(),
            ));
            out.push('\n');
        }
        out
    }
}

fn render_csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| render_csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
