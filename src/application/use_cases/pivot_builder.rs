// ============================================================
// PIVOT BUILDER USE CASE
// ============================================================
// Aggregate a merged report into a pivot table

use std::collections::HashMap;

use crate::domain::csv::{CsvCell, CsvRow};
use crate::domain::error::Result;
use crate::domain::pivot::{AggFunc, PivotSpec, PivotTable};
use crate::domain::report::MergedReport;

#[derive(Debug, Default)]
struct Bucket {
    count: usize,
    numeric_count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Bucket {
    fn add(&mut self, cell: Option<&CsvCell>) {
        let cell = match cell {
            Some(cell) if !cell.is_empty() => cell,
            _ => return,
        };
        self.count += 1;
        if let Some(value) = cell.as_number() {
            if self.numeric_count == 0 {
                self.min = value;
                self.max = value;
            } else {
                self.min = self.min.min(value);
                self.max = self.max.max(value);
            }
            self.numeric_count += 1;
            self.sum += value;
        }
    }

    fn finish(&self, aggfunc: AggFunc) -> CsvCell {
        match aggfunc {
            AggFunc::Count => CsvCell::Number(self.count as f64),
            AggFunc::Sum if self.numeric_count > 0 => CsvCell::Number(self.sum),
            AggFunc::Mean if self.numeric_count > 0 => {
                CsvCell::Number(self.sum / self.numeric_count as f64)
            }
            AggFunc::Min if self.numeric_count > 0 => CsvCell::Number(self.min),
            AggFunc::Max if self.numeric_count > 0 => CsvCell::Number(self.max),
            // No numeric data in this bucket
            _ => CsvCell::Text(String::new()),
        }
    }
}

/// Pivot a merged report according to `spec`.
///
/// Rows are grouped by the tuple of index field values crossed with the
/// tuple of column field values (both in first-seen order), and each
/// values field is aggregated per bucket. An optional group mapping
/// renames one column's values before grouping. Missing keys count as
/// empty and are skipped by every aggregation.
pub fn build_pivot(report: &MergedReport, spec: &PivotSpec) -> Result<PivotTable> {
    spec.validate(&report.headers)?;

    let field_key = |row: &CsvRow, name: &str| -> String {
        let raw = row
            .get(name)
            .map(|cell| cell.to_string())
            .unwrap_or_default();
        if let Some(groups) = &spec.groups {
            if groups.column == name {
                if let Some(mapped) = groups.mapping.get(&raw) {
                    return mapped.clone();
                }
            }
        }
        raw
    };

    let mut index_tuples: Vec<Vec<String>> = Vec::new();
    let mut index_pos: HashMap<Vec<String>, usize> = HashMap::new();
    let mut col_tuples: Vec<Vec<String>> = Vec::new();
    let mut col_pos: HashMap<Vec<String>, usize> = HashMap::new();
    let mut buckets: HashMap<(usize, usize, usize), Bucket> = HashMap::new();

    for row in &report.rows {
        let index_tuple: Vec<String> = spec.index.iter().map(|f| field_key(row, f)).collect();
        let col_tuple: Vec<String> = spec.columns.iter().map(|f| field_key(row, f)).collect();

        let i = *index_pos.entry(index_tuple.clone()).or_insert_with(|| {
            index_tuples.push(index_tuple.clone());
            index_tuples.len() - 1
        });
        let c = *col_pos.entry(col_tuple.clone()).or_insert_with(|| {
            col_tuples.push(col_tuple.clone());
            col_tuples.len() - 1
        });

        for (v, value_field) in spec.values.iter().enumerate() {
            buckets.entry((i, c, v)).or_default().add(row.get(value_field));
        }
    }

    let mut headers: Vec<String> = spec.index.clone();
    for col_tuple in &col_tuples {
        for value_field in &spec.values {
            headers.push(column_label(spec, col_tuple, value_field));
        }
    }

    let mut rows: Vec<Vec<CsvCell>> = Vec::new();
    for (i, index_tuple) in index_tuples.iter().enumerate() {
        let mut row: Vec<CsvCell> = index_tuple
            .iter()
            .map(|key| CsvCell::classify(key))
            .collect();
        for c in 0..col_tuples.len() {
            for v in 0..spec.values.len() {
                let cell = buckets
                    .get(&(i, c, v))
                    .map(|bucket| bucket.finish(spec.aggfunc))
                    .unwrap_or_else(|| CsvCell::Text(String::new()));
                row.push(cell);
            }
        }
        rows.push(row);
    }

    Ok(PivotTable { headers, rows })
}

fn column_label(spec: &PivotSpec, col_tuple: &[String], value_field: &str) -> String {
    if spec.columns.is_empty() {
        value_field.to_string()
    } else if spec.values.len() == 1 {
        col_tuple.join("/")
    } else {
        format!("{}/{}", col_tuple.join("/"), value_field)
    }
}
