//! Application configuration domain model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::ports::AppDirsPort;

pub const APP_DIR_NAME: &str = "superclip";
pub const DEFAULT_STORE_DIR_NAME: &str = "SuperClipboard";

/// Application configuration
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Item store settings
    pub storage: StorageConfig,

    /// Logging settings
    pub log: LogConfig,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit store directory; overrides the resolved default
    pub store_dir: Option<PathBuf>,

    /// Directory name under the application data root
    pub dir_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            dir_name: DEFAULT_STORE_DIR_NAME.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"info,sc_infra=debug"`
    pub filter: Option<String>,

    /// Also write a daily rolling log file
    pub file_logging: bool,

    /// Where log files go; defaults to `<app data root>/logs`
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// The directory backing the item store.
    pub fn resolve_store_dir(&self, app_dirs: &dyn AppDirsPort) -> Result<PathBuf, ClipError> {
        if let Some(dir) = &self.storage.store_dir {
            return Ok(dir.clone());
        }
        let dirs = app_dirs
            .get_app_dirs()
            .map_err(ClipError::store_unavailable)?;
        Ok(dirs.app_data_root.join(&self.storage.dir_name))
    }

    pub fn resolve_log_dir(&self, app_dirs: &dyn AppDirsPort) -> Result<PathBuf, ClipError> {
        if let Some(dir) = &self.log.log_dir {
            return Ok(dir.clone());
        }
        let dirs = app_dirs
            .get_app_dirs()
            .map_err(ClipError::store_unavailable)?;
        Ok(dirs.app_data_root.join("logs"))
    }
}
