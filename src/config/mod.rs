//! Configuration module for savecache
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (retention limit, cache folder name)

pub mod paths;
pub mod settings;

pub use paths::SaveCachePaths;
pub use settings::Settings;
