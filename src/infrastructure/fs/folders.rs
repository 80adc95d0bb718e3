use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};

/// List immediate subdirectories of `base` whose name starts with
/// `keyword` (all subdirectories when the keyword is blank).
///
/// Only directories one level below `base` are considered — never files
/// and never `base` itself. Zero matches is an error: a silently empty
/// report would mislead the caller.
pub fn match_folders(base: &Path, keyword: &str) -> Result<Vec<PathBuf>> {
    let keyword = keyword.trim();

    let entries = fs::read_dir(base).map_err(|err| {
        AppError::DirectoryAccess(format!("Cannot list {}: {}", base.display(), err))
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            AppError::DirectoryAccess(format!("Cannot list {}: {}", base.display(), err))
        })?;
        let file_type = entry.file_type().map_err(|err| {
            AppError::DirectoryAccess(format!(
                "Cannot inspect {}: {}",
                entry.path().display(),
                err
            ))
        })?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(keyword) {
            folders.push(entry.path());
        }
    }

    folders.sort();

    if folders.is_empty() {
        return Err(AppError::NoMatch(format!(
            "No folders found under '{}' starting with keyword '{}'",
            base.display(),
            keyword
        )));
    }

    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_keyword_matches_prefix_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["project1", "project2", "other"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let folders = match_folders(dir.path(), "proj").unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["project1", "project2"]);
    }

    #[test]
    fn test_blank_keyword_matches_all_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let folders = match_folders(dir.path(), "  ").unwrap();
        assert_eq!(folders.len(), 2);
    }

    #[test]
    fn test_files_are_never_matched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("project.csv"), "a\n").unwrap();
        assert!(matches!(
            match_folders(dir.path(), "proj"),
            Err(AppError::NoMatch(_))
        ));
    }

    #[test]
    fn test_zero_matches_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            match_folders(dir.path(), ""),
            Err(AppError::NoMatch(_))
        ));
    }

    #[test]
    fn test_missing_base_is_directory_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            match_folders(&missing, ""),
            Err(AppError::DirectoryAccess(_))
        ));
    }
}
