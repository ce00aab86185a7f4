//! Cached backup listing
//!
//! Formats the cache folder contents for terminal output.

use std::path::Path;

use crate::backup::BackupInfo;
use crate::config::settings::Settings;
use crate::error::CacheResult;
use crate::hook::SaveEvent;

/// List the cached backups of the document at `path`
pub fn handle_list(path: &Path, settings: &Settings) -> CacheResult<()> {
    let event = SaveEvent::new(path)?;
    let rotator = event.rotator(settings);
    let backups = rotator.list(event.working_dir(), event.document_name())?;

    if backups.is_empty() {
        println!(
            "No cached backups for {} in {}.",
            event.document_name(),
            rotator.cache_dir(event.working_dir()).display()
        );
        return Ok(());
    }

    println!("Cached Backups");
    println!("==============");
    println!("Folder: {}", rotator.cache_dir(event.working_dir()).display());
    println!();
    print!("{}", format_backup_list(&backups));
    println!();
    println!(
        "Total: {} backup(s), limit {}",
        backups.len(),
        settings.retention_limit
    );
    Ok(())
}

/// Format cached backups as a table
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    let name_width = backups
        .iter()
        .map(|b| b.entry.filename.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:>10}  {}\n",
        "Slot",
        "File",
        "Size",
        "Modified",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:->10}  {:-<23}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for backup in backups {
        let modified = backup
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:>10}  {}\n",
            backup.entry.index,
            backup.entry.filename,
            format_size(backup.size_bytes),
            modified,
            name_width = name_width,
        ));
    }

    output
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupEntry;
    use std::path::PathBuf;

    fn info(index: u32, size: u64) -> BackupInfo {
        BackupInfo {
            entry: BackupEntry {
                filename: format!("scene.blend{}", index),
                path: PathBuf::from(format!("/p/__savecache__/scene.blend{}", index)),
                index,
            },
            size_bytes: size,
            modified: None,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_backup_list() {
        let output = format_backup_list(&[info(1, 100), info(2, 4096)]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Slot"));
        assert!(lines[2].contains("scene.blend1"));
        assert!(lines[2].contains("100 B"));
        assert!(lines[3].contains("4.0 KB"));
        assert!(lines[3].ends_with('-'));
    }
}
