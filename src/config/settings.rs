//! User settings for savecache
//!
//! Holds the retention limit and cache folder name the host would otherwise
//! read from its own preferences.

use serde::{Deserialize, Serialize};

use super::paths::SaveCachePaths;
use crate::backup::RotationConfig;
use crate::error::CacheError;

/// Default name of the cache subfolder created next to the document
pub const DEFAULT_CACHE_FOLDER: &str = "__savecache__";

/// Default number of numbered backups kept per document
pub const DEFAULT_RETENTION_LIMIT: u32 = 2;

/// User settings for savecache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Highest backup index kept in the cache folder (0 disables rotation)
    #[serde(default = "default_retention_limit")]
    pub retention_limit: u32,

    /// Name of the cache subfolder under the working directory
    #[serde(default = "default_cache_folder_name")]
    pub cache_folder_name: String,

    /// Backup extension override; derived from the saved document when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Print the one-line summary after each rotation
    #[serde(default = "default_print_info")]
    pub print_info: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_retention_limit() -> u32 {
    DEFAULT_RETENTION_LIMIT
}

fn default_cache_folder_name() -> String {
    DEFAULT_CACHE_FOLDER.to_string()
}

fn default_print_info() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            retention_limit: default_retention_limit(),
            cache_folder_name: default_cache_folder_name(),
            extension: None,
            print_info: default_print_info(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SaveCachePaths) -> Result<Self, CacheError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CacheError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CacheError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SaveCachePaths) -> Result<(), CacheError> {
        self.validate()?;
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CacheError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            CacheError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reject folder names and extensions that would escape the working directory
    pub fn validate(&self) -> Result<(), CacheError> {
        let name = self.cache_folder_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(CacheError::Validation(format!(
                "Invalid cache folder name: {:?}",
                name
            )));
        }

        if let Some(ext) = &self.extension {
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(CacheError::Validation(format!(
                    "Invalid backup extension: {:?}",
                    ext
                )));
            }
        }

        Ok(())
    }

    /// Build the rotation config for a document, preferring the configured extension
    pub fn rotation_config(&self, derived_extension: &str) -> RotationConfig {
        RotationConfig {
            retention_limit: self.retention_limit,
            extension: self
                .extension
                .clone()
                .unwrap_or_else(|| derived_extension.to_string()),
            cache_folder_name: self.cache_folder_name.clone(),
        }
    }
}
