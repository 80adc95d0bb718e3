// ============================================================
// CSV TABLE PARSER
// ============================================================
// Full-text CSV parsing into typed domain tables

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::csv::{CsvCell, CsvRow, CsvTable};
use crate::domain::error::{AppError, Result};

use super::split_csv_line;

/// Canonical header form: trimmed, with one layer of balanced surrounding
/// double quotes stripped.
pub fn canonical_header(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse full CSV text into a table.
///
/// Line endings are normalized, blank lines dropped. The first remaining
/// line is the header; every later line becomes a row keyed by the header
/// columns, short rows padded with empty text. Blank input produces an
/// empty table, not an error.
pub fn parse_csv_text(text: &str) -> CsvTable {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty());

    let header_line = match lines.next() {
        Some(line) => line,
        None => return CsvTable::empty(),
    };

    let columns: Vec<String> = split_csv_line(header_line)
        .iter()
        .map(|field| canonical_header(field))
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_csv_line(line);
        let mut row = CsvRow::new();
        for (idx, column) in columns.iter().enumerate() {
            let raw = fields.get(idx).map(String::as_str).unwrap_or("");
            row.insert(column.clone(), CsvCell::classify(raw));
        }
        rows.push(row);
    }

    CsvTable { columns, rows }
}

/// Read a CSV file as text, falling back to lossy UTF-8 for files with
/// stray non-UTF-8 bytes.
pub fn read_csv_text(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|err| AppError::IoError(format!("Failed to open {}: {}", path.display(), err)))?;

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .map_err(|err| AppError::IoError(format!("Failed to read {}: {}", path.display(), err)))?;

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(err) => Ok(String::from_utf8_lossy(err.as_bytes()).to_string()),
    }
}
