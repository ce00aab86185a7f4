//! Save-event hook
//!
//! Turns "the editor just saved this document" into a rotation run. Settings
//! are reloaded for every event so a changed retention limit applies to the
//! very next save.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backup::{BackupRotator, RotationReport};
use crate::config::paths::SaveCachePaths;
use crate::config::settings::Settings;
use crate::error::{CacheError, CacheResult};

/// A document was saved at `document_path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    document_path: PathBuf,
    working_dir: PathBuf,
    document_name: String,
    extension: String,
}

impl SaveEvent {
    /// Derive working directory, document name and extension from a saved path
    ///
    /// `/projects/scene.blend` gives `/projects`, `scene` and `blend`.
    pub fn new(document_path: impl Into<PathBuf>) -> CacheResult<Self> {
        let document_path = document_path.into();

        let document_name = document_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                CacheError::Validation(format!(
                    "Cannot derive document name from {}",
                    document_path.display()
                ))
            })?
            .to_string();

        let extension = document_path
            .extension()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                CacheError::Validation(format!(
                    "Saved document has no extension: {}",
                    document_path.display()
                ))
            })?
            .to_string();

        let working_dir = match document_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            document_path,
            working_dir,
            document_name,
            extension,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Rotator configured for this document from `settings`
    pub fn rotator(&self, settings: &Settings) -> BackupRotator {
        BackupRotator::new(settings.rotation_config(&self.extension))
    }
}

/// Handles save events using settings read from disk
#[derive(Debug, Clone)]
pub struct SaveHook {
    paths: SaveCachePaths,
}

impl SaveHook {
    pub fn new(paths: SaveCachePaths) -> Self {
        Self { paths }
    }

    /// Reload settings and rotate the saved document's backups
    pub fn handle(&self, event: &SaveEvent) -> CacheResult<RotationReport> {
        let settings = Settings::load_or_create(&self.paths)?;
        Self::handle_with(event, &settings)
    }

    /// Rotate the saved document's backups with already-resolved settings
    pub fn handle_with(event: &SaveEvent, settings: &Settings) -> CacheResult<RotationReport> {
        debug!(
            document = %event.document_path.display(),
            limit = settings.retention_limit,
            "handling save event"
        );
        event
            .rotator(settings)
            .rotate(&event.working_dir, &event.document_name)
    }
}
