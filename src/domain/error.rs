use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    InvalidInput(String),
    Forbidden(String),
    NotFound(String),
    DirectoryAccess(String),
    NoMatch(String),
    NoFilesFound(String),
    ResourceLimit(String),
    CorruptState(String),
    IoError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DirectoryAccess(msg) => write!(f, "Directory access error: {}", msg),
            AppError::NoMatch(msg) => write!(f, "No match: {}", msg),
            AppError::NoFilesFound(msg) => write!(f, "No files found: {}", msg),
            AppError::ResourceLimit(msg) => write!(f, "Resource limit exceeded: {}", msg),
            AppError::CorruptState(msg) => write!(f, "Corrupt state: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
