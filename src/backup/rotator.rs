//! Backup rotator
//!
//! Moves numbered backups from a working directory into its cache folder.
//! Every backup keeps its index as its slot. An occupied slot is freed by
//! shifting its occupant one slot up, and whatever would be pushed past the
//! retention limit is deleted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::entry::{BackupEntry, BackupInfo, BackupScheme, DEFAULT_EXTENSION};
use crate::config::settings::{DEFAULT_CACHE_FOLDER, DEFAULT_RETENTION_LIMIT};
use crate::error::{CacheError, CacheResult};

/// Everything a rotation needs, resolved by the caller before the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Highest index kept in the cache folder; 0 disables rotation
    pub retention_limit: u32,
    /// Primary extension of the document (`blend` for `doc.blend3`)
    pub extension: String,
    /// Name of the cache subfolder under the working directory
    pub cache_folder_name: String,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            retention_limit: DEFAULT_RETENTION_LIMIT,
            extension: DEFAULT_EXTENSION.to_string(),
            cache_folder_name: DEFAULT_CACHE_FOLDER.to_string(),
        }
    }
}

/// What a single rotation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Directory the backups were taken from
    pub source_dir: PathBuf,
    /// Cache folder the backups were moved into
    pub cache_dir: PathBuf,
    /// False when rotation is disabled (limit of 0)
    pub performed: bool,
    /// Indices moved in from the working directory
    pub moved: Vec<u32>,
    /// Shifts inside the cache folder, as `(from, to)` slots
    pub shifted: Vec<(u32, u32)>,
    /// Files deleted for exceeding the retention limit
    pub evicted: Vec<PathBuf>,
    /// Working-directory backups that vanished before they could be moved
    pub skipped: Vec<PathBuf>,
}

impl RotationReport {
    fn new(source_dir: &Path, cache_dir: &Path, performed: bool) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
            performed,
            ..Self::default()
        }
    }

    /// Whether the run touched nothing at all
    pub fn is_noop(&self) -> bool {
        self.moved.is_empty()
            && self.shifted.is_empty()
            && self.evicted.is_empty()
            && self.skipped.is_empty()
    }

    /// One-line status message naming source and destination
    pub fn summary(&self) -> String {
        if !self.performed {
            return format!(
                "Backup rotation disabled (retention limit is 0) for {}",
                self.source_dir.display()
            );
        }
        format!(
            "Backup file(s) moved from {} to {}",
            self.source_dir.display(),
            self.cache_dir.display()
        )
    }
}

/// Relocates numbered backups with bounded retention
#[derive(Debug, Clone)]
pub struct BackupRotator {
    config: RotationConfig,
}

impl BackupRotator {
    /// Create a new BackupRotator
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// Path of the cache folder for a working directory
    pub fn cache_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.config.cache_folder_name)
    }

    /// Move every backup of `document_name` from `working_dir` into the cache folder
    ///
    /// Backups are processed newest first (ascending index means newer), so
    /// the highest slot always holds the oldest backup still retained.
    pub fn rotate(&self, working_dir: &Path, document_name: &str) -> CacheResult<RotationReport> {
        let scheme = BackupScheme::new(document_name, &self.config.extension)?;
        let cache_dir = self.cache_dir(working_dir);
        let limit = self.config.retention_limit;

        if limit == 0 {
            debug!(document = document_name, "retention limit is 0, rotation disabled");
            return Ok(RotationReport::new(working_dir, &cache_dir, false));
        }

        ensure_cache_dir(&cache_dir)?;

        let mut report = RotationReport::new(working_dir, &cache_dir, true);
        report.evicted = self.remove_above_limit(&scheme, &cache_dir)?;

        for entry in scheme.scan(working_dir)? {
            self.place(&scheme, &cache_dir, entry, &mut report)?;
        }

        info!(
            moved = report.moved.len(),
            evicted = report.evicted.len(),
            "{}",
            report.summary()
        );
        Ok(report)
    }

    /// Delete cached backups whose index is above the retention limit
    ///
    /// Returns the deleted paths. A missing cache folder is not an error.
    pub fn prune(&self, working_dir: &Path, document_name: &str) -> CacheResult<Vec<PathBuf>> {
        let scheme = BackupScheme::new(document_name, &self.config.extension)?;
        let cache_dir = self.cache_dir(working_dir);
        let limit = self.config.retention_limit;

        if limit == 0 || !cache_dir.is_dir() {
            return Ok(Vec::new());
        }

        self.remove_above_limit(&scheme, &cache_dir)
    }

    /// Delete backups in `cache_dir` left above the limit, e.g. after it was lowered
    fn remove_above_limit(
        &self,
        scheme: &BackupScheme,
        cache_dir: &Path,
    ) -> CacheResult<Vec<PathBuf>> {
        let limit = self.config.retention_limit;

        let mut deleted = Vec::new();
        for entry in scheme.scan(cache_dir)? {
            if entry.index <= limit {
                continue;
            }
            if remove_if_present(&entry.path)? {
                debug!(path = %entry.path.display(), "removed cached backup above limit");
                deleted.push(entry.path);
            }
        }

        Ok(deleted)
    }

    /// List cached backups for a document, newest (lowest index) first
    pub fn list(&self, working_dir: &Path, document_name: &str) -> CacheResult<Vec<BackupInfo>> {
        let scheme = BackupScheme::new(document_name, &self.config.extension)?;
        let cache_dir = self.cache_dir(working_dir);

        if !cache_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = scheme.scan(&cache_dir)?;
        entries.reverse();

        let mut backups = Vec::with_capacity(entries.len());
        for entry in entries {
            match BackupInfo::from_entry(entry) {
                Ok(info) => backups.push(info),
                // Deleted between listing and stat
                Err(CacheError::Io(msg)) => debug!("{}", msg),
                Err(e) => return Err(e),
            }
        }
        Ok(backups)
    }

    /// Move one working-directory backup into its slot
    fn place(
        &self,
        scheme: &BackupScheme,
        cache_dir: &Path,
        entry: BackupEntry,
        report: &mut RotationReport,
    ) -> CacheResult<()> {
        if entry.index > self.config.retention_limit {
            if remove_if_present(&entry.path)? {
                debug!(file = %entry.filename, "evicted backup above limit");
                report.evicted.push(entry.path);
            } else {
                report.skipped.push(entry.path);
            }
            return Ok(());
        }

        if !is_occupied(&entry.path) {
            warn!(file = %entry.filename, "backup vanished before it could be moved");
            report.skipped.push(entry.path);
            return Ok(());
        }

        self.free_slot(scheme, cache_dir, entry.index, report)?;

        let target = scheme.slot_path(cache_dir, entry.index);
        if move_file(&entry.path, &target)? {
            debug!(file = %entry.filename, slot = entry.index, "moved backup into cache");
            report.moved.push(entry.index);
        } else {
            warn!(file = %entry.filename, "backup vanished before it could be moved");
            report.skipped.push(entry.path);
        }
        Ok(())
    }

    /// Make slot `start` vacant by shifting the run of occupied slots above it
    ///
    /// The run is bounded by the retention limit. If it reaches the limit,
    /// the occupant of the last slot is deleted instead of shifted.
    fn free_slot(
        &self,
        scheme: &BackupScheme,
        cache_dir: &Path,
        start: u32,
        report: &mut RotationReport,
    ) -> CacheResult<()> {
        let limit = self.config.retention_limit;

        let mut top = start;
        while top <= limit && slot_occupied(&scheme.slot_path(cache_dir, top))? {
            top += 1;
        }
        if top == start {
            return Ok(());
        }

        if top > limit {
            let oldest = scheme.slot_path(cache_dir, limit);
            if remove_if_present(&oldest)? {
                debug!(slot = limit, "evicted oldest cached backup");
                report.evicted.push(oldest);
            }
            top = limit;
        }

        for index in (start..top).rev() {
            let from = scheme.slot_path(cache_dir, index);
            let to = scheme.slot_path(cache_dir, index + 1);
            if move_file(&from, &to)? {
                debug!(from = index, to = index + 1, "shifted cached backup");
                report.shifted.push((index, index + 1));
            }
        }

        Ok(())
    }
}

/// Rotate with the default extension and cache folder name
pub fn rotate(
    working_dir: &Path,
    document_name: &str,
    retention_limit: u32,
) -> CacheResult<RotationReport> {
    BackupRotator::new(RotationConfig {
        retention_limit,
        ..RotationConfig::default()
    })
    .rotate(working_dir, document_name)
}

/// Create the cache folder; an existing directory counts as success
fn ensure_cache_dir(path: &Path) -> CacheResult<()> {
    match fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created cache directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(CacheError::CacheDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether a cache slot holds a file or symlink; a directory in a slot is an error
fn slot_occupied(path: &Path) -> CacheResult<bool> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => Err(CacheError::Validation(format!(
            "Cache slot is a directory: {}",
            path.display()
        ))),
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Move `src` to `dst`. Returns `Ok(false)` if `src` no longer exists.
fn move_file(src: &Path, dst: &Path) -> CacheResult<bool> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(rename_err) => {
            // rename cannot cross filesystems, e.g. a cache folder that is a mount point
            match fs::copy(src, dst) {
                Ok(_) => {
                    if let Err(e) = fs::remove_file(src) {
                        let _ = fs::remove_file(dst);
                        return Err(CacheError::io_at("move", src, e));
                    }
                    Ok(true)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(_) => Err(CacheError::io_at("move", src, rename_err)),
            }
        }
    }
}

/// Delete `path`. Returns `Ok(false)` if it was already gone.
fn remove_if_present(path: &Path) -> CacheResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::io_at("delete", path, e)),
    }
}
