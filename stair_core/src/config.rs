//! # Configuration
//!
//! [`StoreConfig`] tells a [`ProjectStore`](crate::store::ProjectStore) where
//! its file lives. [`Preferences`] holds user defaults for the input form and
//! is persisted separately from the project list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculations::stair::DEFAULT_TREAD_DEPTH;
use crate::errors::{StairError, StairResult};
use crate::file_io::{read_optional, write_atomic};

/// File name of the project list inside the documents directory.
pub const STORE_FILE_NAME: &str = "stair_projects.json";

const APP_DIR_NAME: &str = "stairwise";
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Default store location: `<documents>/stair_projects.json`.
///
/// Falls back to the home directory, then the working directory.
pub fn default_store_path() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_FILE_NAME)
}

/// Default preferences location: `<config>/stairwise/preferences.json`.
pub fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(PREFERENCES_FILE_NAME)
}

/// Where and how a project store persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The single file holding the project list
    pub path: PathBuf,

    /// Hold an exclusive OS lock on the file for the store's lifetime
    pub lock_file: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            lock_file: false,
        }
    }

    pub fn with_lock(mut self, lock_file: bool) -> Self {
        self.lock_file = lock_file;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(default_store_path())
    }
}

/// User defaults for the calculation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Tread depth prefilled into new calculations (cm)
    pub default_tread_depth: f64,

    /// Overrides the default store location when set
    pub store_path: Option<PathBuf>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            default_tread_depth: DEFAULT_TREAD_DEPTH,
            store_path: None,
        }
    }
}

impl Preferences {
    /// Load preferences from `path`.
    ///
    /// A missing, unreadable or malformed file yields defaults; the problem
    /// is logged rather than returned.
    pub fn load(path: &Path) -> Self {
        let contents = match read_optional(path) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Preferences::default(),
            Err(e) => {
                log::warn!("Using default preferences: {}", e);
                return Preferences::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Ignoring malformed preferences in {}: {}", path.display(), e);
                Preferences::default()
            }
        }
    }

    /// Save preferences atomically.
    pub fn save(&self, path: &Path) -> StairResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StairError::Serialization {
            reason: e.to_string(),
        })?;
        write_atomic(path, &json)
    }

    /// Store configuration implied by these preferences.
    pub fn store_config(&self) -> StoreConfig {
        match &self.store_path {
            Some(path) => StoreConfig::new(path.clone()),
            None => StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_use_expected_file_names() {
        assert!(default_store_path().ends_with(STORE_FILE_NAME));
        assert!(default_preferences_path().ends_with("stairwise/preferences.json"));
    }

    #[test]
    fn test_preferences_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let prefs = Preferences {
            default_tread_depth: 28.0,
            store_path: Some(dir.path().join("projects.json")),
        };
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn test_preferences_missing_or_malformed_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        assert_eq!(Preferences::load(&path), Preferences::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn test_preferences_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"store_path": "/tmp/elsewhere.json"}"#).unwrap();

        let prefs = Preferences::load(&path);
        assert_eq!(prefs.default_tread_depth, DEFAULT_TREAD_DEPTH);
        assert_eq!(prefs.store_config().path, PathBuf::from("/tmp/elsewhere.json"));
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::new("/tmp/p.json").with_lock(true);
        assert!(config.lock_file);
        assert_eq!(config.path, PathBuf::from("/tmp/p.json"));
        assert!(!StoreConfig::default().lock_file);
    }
}
