//! Configuration domain models

mod app_config;

pub use app_config::{AppConfig, LogConfig, StorageConfig, APP_DIR_NAME, DEFAULT_STORE_DIR_NAME};
