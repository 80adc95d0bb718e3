// ============================================================
// FLOW CATALOG USE CASE
// ============================================================
// Listing flow CSV files and inspecting their column headers

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{canonical_header, read_csv_text, split_csv_line};

static FLOW_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._-]*$").unwrap());

/// Flow listing and header inspection over one fixed data directory.
pub struct FlowCatalog {
    data_dir: PathBuf,
}

impl FlowCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Base names of every `.csv` file directly inside the data directory,
    /// sorted. A missing directory yields an empty list, not an error.
    pub fn list_flows(&self) -> Result<Vec<String>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|err| {
            AppError::DirectoryAccess(format!(
                "Cannot list {}: {}",
                self.data_dir.display(),
                err
            ))
        })?;

        let mut flows = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                AppError::DirectoryAccess(format!(
                    "Cannot list {}: {}",
                    self.data_dir.display(),
                    err
                ))
            })?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if path.is_file() && is_csv {
                if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
                    flows.push(stem.to_string());
                }
            }
        }

        flows.sort();
        Ok(flows)
    }

    /// Column headers of `<flow>.csv`: the first non-empty line, split and
    /// normalized. The flow name must not escape the data directory.
    pub fn flow_columns(&self, flow_name: &str) -> Result<Vec<String>> {
        if !FLOW_NAME_PATTERN.is_match(flow_name) {
            return Err(AppError::InvalidInput(format!(
                "Invalid flow name '{}'",
                flow_name
            )));
        }

        let path = self.data_dir.join(format!("{}.csv", flow_name));
        if !path.is_file() {
            return Err(AppError::NotFound(format!("Flow '{}' not found", flow_name)));
        }

        let text = read_csv_text(&path)?;
        let header_line = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .split('\n')
            .find(|line| !line.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_default();

        if header_line.is_empty() {
            return Ok(Vec::new());
        }

        Ok(split_csv_line(&header_line)
            .iter()
            .map(|field| canonical_header(field))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_csv_base_names_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("beta.csv"), "a\n").unwrap();
        fs::write(dir.path().join("alpha.csv"), "a\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = FlowCatalog::new(dir.path());
        assert_eq!(catalog.list_flows().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FlowCatalog::new(dir.path().join("gone"));
        assert!(catalog.list_flows().unwrap().is_empty());
    }

    #[test]
    fn test_nested_csv_files_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.csv"), "a\n").unwrap();

        let catalog = FlowCatalog::new(dir.path());
        assert!(catalog.list_flows().unwrap().is_empty());
    }

    #[test]
    fn test_columns_come_from_first_non_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("power.csv"),
            "\n  \nblock,\"rail\",leakage\n1,2,3\n",
        )
        .unwrap();

        let catalog = FlowCatalog::new(dir.path());
        assert_eq!(
            catalog.flow_columns("power").unwrap(),
            vec!["block", "rail", "leakage"]
        );
    }

    #[test]
    fn test_unknown_flow_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FlowCatalog::new(dir.path());
        assert!(matches!(
            catalog.flow_columns("ghost"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_escaping_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FlowCatalog::new(dir.path());
        for name in ["../secrets", "a/b", "..", ".hidden"] {
            assert!(
                matches!(catalog.flow_columns(name), Err(AppError::InvalidInput(_))),
                "name '{}' should be rejected",
                name
            );
        }
    }
}
