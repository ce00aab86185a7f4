//! Path management for savecache
//!
//! Resolves where the settings file lives.
//!
//! ## Path Resolution Order
//!
//! 1. `SAVECACHE_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/savecache` or `~/.config/savecache`
//! 3. Windows: `%APPDATA%\savecache`

use std::path::PathBuf;

use crate::error::CacheError;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "SAVECACHE_CONFIG_DIR";

/// Manages all paths used by savecache
#[derive(Debug, Clone)]
pub struct SaveCachePaths {
    /// Base directory for savecache configuration
    base_dir: PathBuf,
}

impl SaveCachePaths {
    /// Create a new SaveCachePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CacheError> {
        let base_dir = if let Ok(custom) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SaveCachePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/savecache/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default config directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CacheError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME")
                .map_err(|_| CacheError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("savecache"))
}

/// Resolve the default config directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CacheError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CacheError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("savecache"))
}
