use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::error::{AppError, Result};

/// Recursively collect every `.csv` file (case-insensitive) under `root`.
///
/// Entries are visited depth-first in name order, so the result is
/// deterministic for a fixed filesystem state. The walk fails as a whole
/// if the root is missing, is not a directory, or any subdirectory is
/// unreadable — a partial file list would silently under-report data.
pub fn collect_csv_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|err| {
        AppError::DirectoryAccess(format!("Cannot access {}: {}", root.display(), err))
    })?;
    if !metadata.is_dir() {
        return Err(AppError::DirectoryAccess(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            AppError::DirectoryAccess(format!("Walk failed under {}: {}", root.display(), err))
        })?;
        if entry.file_type().is_file() && has_csv_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, "a,b\n1,2\n").unwrap();
    }

    #[test]
    fn test_finds_nested_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        fs::create_dir_all(&nested).unwrap();
        touch(&dir.path().join("top.csv"));
        touch(&nested.join("deep.csv"));
        touch(&dir.path().join("notes.txt"));

        let files = collect_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().is_some()));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("UPPER.CSV"));
        touch(&dir.path().join("mixed.Csv"));

        let files = collect_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_missing_root_is_directory_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            collect_csv_files(&missing),
            Err(AppError::DirectoryAccess(_))
        ));
    }

    #[test]
    fn test_file_root_is_directory_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.csv");
        touch(&file);
        assert!(matches!(
            collect_csv_files(&file),
            Err(AppError::DirectoryAccess(_))
        ));
    }

    #[test]
    fn test_order_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.csv"));
        touch(&dir.path().join("a.csv"));
        touch(&dir.path().join("c.csv"));

        let first = collect_csv_files(dir.path()).unwrap();
        let second = collect_csv_files(dir.path()).unwrap();
        assert_eq!(first, second);
        let names: Vec<_> = first
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }
}
