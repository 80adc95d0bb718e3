// ============================================================
// REPORT AGGREGATOR USE CASE
// ============================================================
// Orchestrate folder matching, file discovery, and CSV parsing into
// one merged dataset

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::csv::CsvRow;
use crate::domain::error::{AppError, Result};
use crate::domain::report::{MergedReport, ReportMeta};
use crate::infrastructure::csv::{parse_csv_text, read_csv_text};
use crate::infrastructure::fs::{collect_csv_files, match_folders};

/// Safety caps for one aggregate call, so an unbounded directory tree
/// cannot turn a single request into an unbounded scan.
#[derive(Debug, Clone, Copy)]
pub struct AggregateLimits {
    pub max_csv_files: usize,
    pub max_total_bytes: u64,
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self {
            max_csv_files: 500,
            max_total_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Builds a merged report from every CSV file under the folders matching
/// a keyword. Fail-fast at every stage: no matched folders, no CSV files,
/// or any unreadable file aborts the whole request rather than producing
/// misleading partial totals.
pub struct ReportAggregator {
    limits: AggregateLimits,
}

impl ReportAggregator {
    pub fn new(limits: AggregateLimits) -> Self {
        Self { limits }
    }

    pub fn aggregate(&self, base_dir: &str, start_keyword: &str) -> Result<MergedReport> {
        let base_dir = base_dir.trim();
        if base_dir.is_empty() {
            return Err(AppError::InvalidInput(
                "baseDir must be a non-empty string".to_string(),
            ));
        }

        let base = Path::new(base_dir);
        let metadata = fs::metadata(base).map_err(|err| {
            AppError::DirectoryAccess(format!("Base directory not found: {}: {}", base_dir, err))
        })?;
        if !metadata.is_dir() {
            return Err(AppError::DirectoryAccess(format!(
                "{} is not a directory",
                base_dir
            )));
        }

        let keyword = start_keyword.trim();
        let folders = match_folders(base, keyword)?;

        let mut files = Vec::new();
        for folder in &folders {
            files.extend(collect_csv_files(folder)?);
        }
        if files.is_empty() {
            return Err(AppError::NoFilesFound(format!(
                "Found {} folder(s) but no CSV files inside them",
                folders.len()
            )));
        }
        if files.len() > self.limits.max_csv_files {
            return Err(AppError::ResourceLimit(format!(
                "{} CSV files matched, limit is {}",
                files.len(),
                self.limits.max_csv_files
            )));
        }

        tracing::debug!(
            "Merging {} CSV file(s) from {} folder(s) under {}",
            files.len(),
            folders.len(),
            base_dir
        );

        let mut headers: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut rows: Vec<CsvRow> = Vec::new();
        let mut total_bytes: u64 = 0;

        for file in &files {
            let text = read_csv_text(file)?;
            total_bytes += text.len() as u64;
            if total_bytes > self.limits.max_total_bytes {
                return Err(AppError::ResourceLimit(format!(
                    "Aggregate read exceeded {} bytes",
                    self.limits.max_total_bytes
                )));
            }

            let table = parse_csv_text(&text);
            for column in table.columns {
                if seen.insert(column.clone()) {
                    headers.push(column);
                }
            }
            rows.extend(table.rows);
        }

        let matched_folders = folders
            .iter()
            .map(|folder| {
                folder
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect();

        let meta = ReportMeta {
            base_dir: base_dir.to_string(),
            start_keyword: keyword.to_string(),
            matched_folders,
            csv_count: files.len(),
            row_count: rows.len(),
            col_count: headers.len(),
        };

        Ok(MergedReport {
            headers,
            rows,
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::CsvCell;
    use std::fs;
    use std::path::Path;

    fn write_csv(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn aggregator() -> ReportAggregator {
        ReportAggregator::new(AggregateLimits::default())
    }

    #[test]
    fn test_merges_all_subdirectories_with_blank_keyword() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("A").join("one.csv"), "x,y\n1,2\n");
        write_csv(&dir.path().join("B").join("two.csv"), "x,y\n3,4\n");

        let report = aggregator()
            .aggregate(dir.path().to_str().unwrap(), "")
            .unwrap();
        assert_eq!(report.meta.matched_folders, vec!["A", "B"]);
        assert_eq!(report.meta.csv_count, 2);
        assert_eq!(report.meta.row_count, 2);
    }

    #[test]
    fn test_keyword_restricts_matched_folders() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("project1").join("a.csv"), "x\n1\n");
        write_csv(&dir.path().join("project2").join("b.csv"), "x\n2\n");
        write_csv(&dir.path().join("other").join("c.csv"), "x\n3\n");

        let report = aggregator()
            .aggregate(dir.path().to_str().unwrap(), "proj")
            .unwrap();
        assert_eq!(report.meta.matched_folders, vec!["project1", "project2"]);
        assert_eq!(report.meta.row_count, 2);
    }

    #[test]
    fn test_column_union_keeps_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("A").join("one.csv"), "x,y\n1,2\n");
        write_csv(&dir.path().join("A").join("two.csv"), "y,z\n3,4\n");

        let report = aggregator()
            .aggregate(dir.path().to_str().unwrap(), "")
            .unwrap();
        assert_eq!(report.headers, vec!["x", "y", "z"]);
        assert_eq!(report.meta.col_count, 3);

        // Rows from the first file never gain a key they didn't declare
        assert!(report.rows[0].get("z").is_none());
        assert_eq!(report.rows[0].get("x"), Some(&CsvCell::Number(1.0)));
    }

    #[test]
    fn test_empty_base_dir_is_invalid_input() {
        assert!(matches!(
            aggregator().aggregate("   ", "x"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_base_dir_is_directory_access_error() {
        assert!(matches!(
            aggregator().aggregate("/definitely/not/here", ""),
            Err(AppError::DirectoryAccess(_))
        ));
    }

    #[test]
    fn test_no_subdirectories_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            aggregator().aggregate(dir.path().to_str().unwrap(), ""),
            Err(AppError::NoMatch(_))
        ));
    }

    #[test]
    fn test_matched_folders_without_csv_is_no_files_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        assert!(matches!(
            aggregator().aggregate(dir.path().to_str().unwrap(), ""),
            Err(AppError::NoFilesFound(_))
        ));
    }

    #[test]
    fn test_file_count_cap_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("A").join("one.csv"), "x\n1\n");
        write_csv(&dir.path().join("A").join("two.csv"), "x\n2\n");

        let tight = ReportAggregator::new(AggregateLimits {
            max_csv_files: 1,
            max_total_bytes: u64::MAX,
        });
        assert!(matches!(
            tight.aggregate(dir.path().to_str().unwrap(), ""),
            Err(AppError::ResourceLimit(_))
        ));
    }

    #[test]
    fn test_byte_cap_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("A").join("one.csv"), "x,y\n1,2\n3,4\n");

        let tight = ReportAggregator::new(AggregateLimits {
            max_csv_files: 500,
            max_total_bytes: 4,
        });
        assert!(matches!(
            tight.aggregate(dir.path().to_str().unwrap(), ""),
            Err(AppError::ResourceLimit(_))
        ));
    }

    #[test]
    fn test_keyword_is_echoed_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("proj").join("a.csv"), "x\n1\n");

        let report = aggregator()
            .aggregate(dir.path().to_str().unwrap(), " proj ")
            .unwrap();
        assert_eq!(report.meta.start_keyword, "proj");
    }
}
