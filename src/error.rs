//! Custom error types for savecache
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for savecache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid input (bad document path, folder name, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The cache subfolder could not be created
    #[error("Failed to create cache directory {}: {source}", path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Build an I/O error that names the file it happened on
    pub fn io_at(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io(format!("Failed to {} {}: {}", action, path.display(), err))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for savecache operations
pub type CacheResult<T> = Result<T, CacheError>;
