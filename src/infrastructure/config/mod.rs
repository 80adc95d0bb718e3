use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Service configuration, resolved from defaults, an optional
/// `flowboard.toml`, and `FLOWBOARD_*` environment variables.
///
/// Passed explicitly into each component at construction so tests can run
/// several instances against different roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Root directory for static assets.
    pub web_root: PathBuf,

    /// Directory holding the flow CSV files.
    pub data_dir: PathBuf,

    /// Path of the persisted task document.
    pub task_file: PathBuf,

    /// Path of the persisted pivot configuration document.
    pub pivot_config_file: PathBuf,

    /// Maximum CSV files merged per report request.
    pub max_csv_files: usize,

    /// Maximum total bytes read per report request.
    pub max_total_bytes: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            web_root: PathBuf::from("./public"),
            data_dir: PathBuf::from("./data"),
            task_file: PathBuf::from("./data/tasks.json"),
            pivot_config_file: PathBuf::from("./data/pivot_config.json"),
            max_csv_files: 500,
            max_total_bytes: 64 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Resolve the effective configuration.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(ServiceConfig::default()))
            .merge(Toml::file("flowboard.toml"))
            .merge(Env::prefixed("FLOWBOARD_"))
            .extract()
            .map_err(|err| AppError::Internal(format!("Invalid configuration: {}", err)))
    }
}
