// ============================================================
// JSON DOCUMENT STORAGE
// ============================================================
// Whole-document read/replace over single JSON files on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::domain::error::{AppError, Result};
use crate::domain::pivot::PivotSpec;

/// A single JSON document on disk with atomic whole-document replace.
///
/// Writers serialize behind a mutex and go through a temp-file-then-rename
/// step, so a concurrent reader never observes a half-written document.
pub struct JsonDocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored document, or `None` when no document exists yet.
    pub fn read_json(&self) -> Result<Option<Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AppError::IoError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        serde_json::from_str(&content).map(Some).map_err(|err| {
            AppError::CorruptState(format!(
                "Stored document {} is not valid JSON: {}",
                self.path.display(),
                err
            ))
        })
    }

    /// Atomically replace the stored document.
    pub fn write_json(&self, value: &Value) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(value)
            .map_err(|err| AppError::Internal(format!("Failed to serialize document: {}", err)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|err| {
            AppError::IoError(format!("Failed to write {}: {}", tmp_path.display(), err))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            AppError::IoError(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                err
            ))
        })?;

        tracing::debug!("Document saved at {}", self.path.display());
        Ok(())
    }
}

/// Task list persistence: an opaque JSON array, read and replaced whole.
pub struct TaskStore {
    store: JsonDocumentStore,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonDocumentStore::new(path),
        }
    }

    /// The stored task array, or an empty list when nothing was saved yet.
    pub fn read_tasks(&self) -> Result<Vec<Value>> {
        match self.store.read_json()? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(AppError::CorruptState(format!(
                "Task document {} is not a JSON array",
                self.store.path().display()
            ))),
        }
    }

    /// Replace the whole task list. Rejects non-array payloads before
    /// touching storage.
    pub fn replace_tasks(&self, payload: &Value) -> Result<()> {
        if !payload.is_array() {
            return Err(AppError::InvalidInput(
                "Task payload must be a JSON array".to_string(),
            ));
        }
        self.store.write_json(payload)
    }
}

/// Last-used pivot specification, persisted like the task document.
pub struct PivotConfigStore {
    store: JsonDocumentStore,
}

impl PivotConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonDocumentStore::new(path),
        }
    }

    /// The stored spec, or the default spec when none was saved yet.
    pub fn read_spec(&self) -> Result<PivotSpec> {
        match self.store.read_json()? {
            None => Ok(PivotSpec::default()),
            Some(value) => serde_json::from_value(value).map_err(|err| {
                AppError::CorruptState(format!(
                    "Stored pivot config {} is malformed: {}",
                    self.store.path().display(),
                    err
                ))
            }),
        }
    }

    pub fn write_spec(&self, spec: &PivotSpec) -> Result<()> {
        let value = serde_json::to_value(spec)
            .map_err(|err| AppError::Internal(format!("Failed to serialize spec: {}", err)))?;
        self.store.write_json(&value)
    }
}
