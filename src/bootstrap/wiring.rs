//! # Dependency Injection / 依赖注入模块
//!
//! Builds the store, the bus, the provider and the facade from an `AppConfig`.
//! 根据 `AppConfig` 组装存储、总线、provider 与门面。
//!
//! This is the only place that depends on sc-infra, sc-platform and sc-app at
//! once. It assembles; it does not decide.
//! 这是唯一同时依赖 sc-infra、sc-platform 和 sc-app 的地方，只负责组装。

use std::path::PathBuf;
use std::sync::Arc;

use sc_app::SuperClipboard;
use sc_core::config::AppConfig;
use sc_core::ports::{AppDirsPort, ClipboardBusPort, ItemStorePort};
use sc_infra::FilesystemItemStore;
use sc_platform::{ClipboardProvider, DirsAppDirsAdapter, InMemoryClipboardBus};
use tracing::info;

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors that can occur during dependency wiring
/// 依赖装配过程中可能出现的错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Item store initialization failed: {0}")]
    StoreInit(String),

    #[error("Log directory resolution failed: {0}")]
    LogDirInit(String),
}

/// Everything a host process needs to serve and use the clipboard store.
pub struct SuperClipboardApp {
    pub clipboard: Arc<SuperClipboard>,
    pub provider: ClipboardProvider,
    pub bus: Arc<dyn ClipboardBusPort>,
    pub store_dir: PathBuf,
}

/// Wire with the system data directory and a process-local bus.
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<SuperClipboardApp> {
    wire_with(
        config,
        &DirsAppDirsAdapter::new(),
        Arc::new(InMemoryClipboardBus::new()),
    )
}

/// Wire against an explicit directory resolver and bus.
pub fn wire_with(
    config: &AppConfig,
    app_dirs: &dyn AppDirsPort,
    bus: Arc<dyn ClipboardBusPort>,
) -> WiringResult<SuperClipboardApp> {
    let store_dir = config
        .resolve_store_dir(app_dirs)
        .map_err(|e| WiringError::StoreInit(e.to_string()))?;

    let store: Arc<dyn ItemStorePort> = Arc::new(FilesystemItemStore::new(store_dir.clone()));
    let provider = ClipboardProvider::new(store.clone());
    let clipboard = Arc::new(SuperClipboard::new(store, bus.clone()));

    info!(store_dir = %store_dir.display(), "Clipboard store wired");

    Ok(SuperClipboardApp {
        clipboard,
        provider,
        bus,
        store_dir,
    })
}

/// Log directory for file logging.
pub fn resolve_log_dir(config: &AppConfig, app_dirs: &dyn AppDirsPort) -> WiringResult<PathBuf> {
    config
        .resolve_log_dir(app_dirs)
        .map_err(|e| WiringError::LogDirInit(e.to_string()))
}
