//! Numbered backup naming and discovery
//!
//! A backup of `report.blend` saved by the editor is named `report.blend1`,
//! `report.blend2`, ... with no separator between extension and index.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{CacheError, CacheResult};

/// Extension used when no document extension is known
pub const DEFAULT_EXTENSION: &str = "blend";

/// A numbered backup file found in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Backup filename
    pub filename: String,
    /// Full path to the backup
    pub path: PathBuf,
    /// Numeric suffix (save generation slot)
    pub index: u32,
}

/// Metadata about a backup sitting in the cache folder
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// The entry itself
    pub entry: BackupEntry,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time, if the platform reports one
    pub modified: Option<DateTime<Utc>>,
}

/// Naming scheme for one document's backups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupScheme {
    /// `<document>.<extension>`, shared by every slot name
    prefix: String,
}

impl BackupScheme {
    /// Create the scheme for `document_name` with the given primary extension
    pub fn new(document_name: &str, extension: &str) -> CacheResult<Self> {
        if document_name.is_empty() || document_name.contains(['/', '\\']) {
            return Err(CacheError::Validation(format!(
                "Invalid document name: {:?}",
                document_name
            )));
        }
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\', '.']) {
            return Err(CacheError::Validation(format!(
                "Invalid backup extension: {:?}",
                extension
            )));
        }

        Ok(Self {
            prefix: format!("{}.{}", document_name, extension),
        })
    }

    /// Filename of the backup in slot `index`
    pub fn filename(&self, index: u32) -> String {
        format!("{}{}", self.prefix, index)
    }

    /// Full path of slot `index` inside `dir`
    pub fn slot_path(&self, dir: &Path, index: u32) -> PathBuf {
        dir.join(self.filename(index))
    }

    /// Parse the slot index out of a filename, if it is one of our backups
    ///
    /// Only canonical positive decimals are accepted: `doc.blend0` and
    /// `doc.blend01` are not backups.
    pub fn parse_index(&self, filename: &str) -> Option<u32> {
        let digits = filename.strip_prefix(&self.prefix)?;
        if digits.is_empty() || digits.starts_with('0') {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// List the backups in `dir`, highest index first
    pub fn scan(&self, dir: &Path) -> CacheResult<Vec<BackupEntry>> {
        let mut entries = Vec::new();

        for dir_entry in
            fs::read_dir(dir).map_err(|e| CacheError::io_at("read directory", dir, e))?
        {
            let dir_entry =
                dir_entry.map_err(|e| CacheError::io_at("read directory entry in", dir, e))?;

            // Non UTF-8 names can never match the scheme
            let Some(filename) = dir_entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(index) = self.parse_index(&filename) else {
                continue;
            };

            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }

            entries.push(BackupEntry {
                filename,
                path,
                index,
            });
        }

        entries.sort_by(|a, b| b.index.cmp(&a.index));
        Ok(entries)
    }
}

impl BackupInfo {
    /// Read size and modification time for an entry
    pub fn from_entry(entry: BackupEntry) -> CacheResult<Self> {
        let metadata = fs::metadata(&entry.path)
            .map_err(|e| CacheError::io_at("read metadata of", &entry.path, e))?;

        Ok(Self {
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scheme() -> BackupScheme {
        BackupScheme::new("doc", "blend").unwrap()
    }

    #[test]
    fn test_filename_has_no_separator() {
        let scheme = scheme();
        assert_eq!(scheme.filename(3), "doc.blend3");
        assert_eq!(
            scheme.slot_path(Path::new("/work"), 12),
            PathBuf::from("/work/doc.blend12")
        );
    }

    #[test]
    fn test_leading_dot_in_extension_is_stripped() {
        let scheme = BackupScheme::new("doc", ".blend").unwrap();
        assert_eq!(scheme.filename(1), "doc.blend1");
    }

    #[test]
    fn test_parse_index() {
        let scheme = scheme();
        assert_eq!(scheme.parse_index("doc.blend1"), Some(1));
        assert_eq!(scheme.parse_index("doc.blend42"), Some(42));

        assert_eq!(scheme.parse_index("doc.blend"), None);
        assert_eq!(scheme.parse_index("doc.blend0"), None);
        assert_eq!(scheme.parse_index("doc.blend01"), None);
        assert_eq!(scheme.parse_index("doc.blend1x"), None);
        assert_eq!(scheme.parse_index("doc.blend+1"), None);
        assert_eq!(scheme.parse_index("doc.blend1.tmp"), None);
        assert_eq!(scheme.parse_index("other.blend1"), None);
        assert_eq!(scheme.parse_index("mydoc.blend1"), None);
        assert_eq!(scheme.parse_index("doc.blend99999999999"), None);
    }

    #[test]
    fn test_document_name_with_regex_characters() {
        let scheme = BackupScheme::new("v1.0 (final)", "blend").unwrap();
        assert_eq!(scheme.parse_index("v1.0 (final).blend2"), Some(2));
        assert_eq!(scheme.parse_index("v1x0 (final).blend2"), None);
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(BackupScheme::new("", "blend").unwrap_err().is_validation());
        assert!(BackupScheme::new("a/b", "blend").is_err());
        assert!(BackupScheme::new("doc", "").is_err());
        assert!(BackupScheme::new("doc", "tar.gz").is_err());
    }

    #[test]
    fn test_scan_sorts_numerically_descending() {
        let temp = TempDir::new().unwrap();
        for index in [1, 2, 10, 3, 21] {
            fs::write(temp.path().join(format!("doc.blend{}", index)), "x").unwrap();
        }
        fs::write(temp.path().join("doc.blend"), "current").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp.path().join("doc.blend4")).unwrap();

        let indices: Vec<u32> = scheme()
            .scan(temp.path())
            .unwrap()
            .into_iter()
            .map(|e| e.index)
            .collect();
        assert_eq!(indices, vec![21, 10, 3, 2, 1]);
    }

    #[test]
    fn test_scan_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let err = scheme().scan(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
    }

    #[test]
    fn test_backup_info_reads_size() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doc.blend1"), "12345").unwrap();

        let entry = scheme().scan(temp.path()).unwrap().remove(0);
        let info = BackupInfo::from_entry(entry).unwrap();
        assert_eq!(info.size_bytes, 5);
        assert_eq!(info.entry.index, 1);
    }
}
