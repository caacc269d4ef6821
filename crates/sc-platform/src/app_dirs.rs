use std::path::PathBuf;

use sc_core::{
    app_dirs::AppDirs,
    config::APP_DIR_NAME,
    ports::{AppDirsError, AppDirsPort},
};

#[derive(Debug, Default)]
pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    /// Creates a new DirsAppDirsAdapter with no base data directory override.
    ///
    /// # Examples
    ///
    /// ```
    /// use sc_platform::app_dirs::DirsAppDirsAdapter;
    /// let _ = DirsAppDirsAdapter::new();
    /// ```
    pub fn new() -> Self {
        Self {
            base_data_local_dir_override: None,
        }
    }

    /// Creates an adapter that resolves everything under `base` instead of the
    /// system data-local directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sc_platform::app_dirs::DirsAppDirsAdapter;
    ///
    /// let adapter = DirsAppDirsAdapter::with_base_data_local_dir(PathBuf::from("/tmp"));
    /// ```
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(base),
        }
    }

    /// Resolve the base local data directory used for application data.
    ///
    /// Returns the override when one was set, otherwise `dirs::data_local_dir()`.
    /// Returns `None` if no override is set and the system directory is unavailable.
    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    /// `AppDirs` with `app_data_root` set to the base local data directory joined with `"superclip"`.
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base_data.join(APP_DIR_NAME),
        })
    }
}
