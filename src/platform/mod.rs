//! Platform abstraction layer
//!
//! Handles native/browser differences for:
//! - Where collections and settings live (data/config directories)
//! - Storage (LocalStorage on web)

/// Directory name under the platform data/config roots
pub const APP_DIR: &str = "commander-tracker";

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "settings.json";

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use super::{APP_DIR, SETTINGS_FILE};

    /// `<data_dir>/commander-tracker`, or `./commander-tracker` without a home
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// `<config_dir>/commander-tracker/settings.json`
    pub fn settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(SETTINGS_FILE)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{default_data_dir, settings_path};

/// The window's LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn local_storage() -> Result<web_sys::Storage, crate::persistence::StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| {
            crate::persistence::StorageError::Unavailable("LocalStorage is not available".into())
        })
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_paths_end_in_app_dir() {
        assert!(default_data_dir().ends_with(APP_DIR));
        let settings = settings_path();
        assert!(settings.ends_with(SETTINGS_FILE));
        assert!(settings.parent().unwrap().ends_with(APP_DIR));
    }
}
