//! Rotation CLI commands
//!
//! Implements `rotate`, `on-save` and `prune`.

use std::path::Path;

use crate::backup::{BackupRotator, RotationConfig, RotationReport};
use crate::config::settings::Settings;
use crate::error::CacheResult;
use crate::hook::{SaveEvent, SaveHook};

/// Rotate backups of `document` in `dir` with an explicit config
pub fn handle_rotate(
    dir: &Path,
    document: &str,
    config: RotationConfig,
    quiet: bool,
) -> CacheResult<()> {
    let report = BackupRotator::new(config).rotate(dir, document)?;
    print_report(&report, quiet);
    Ok(())
}

/// Handle a save event for the document at `path`
pub fn handle_on_save(path: &Path, settings: &Settings, quiet: bool) -> CacheResult<()> {
    let event = SaveEvent::new(path)?;
    let report = SaveHook::handle_with(&event, settings)?;
    print_report(&report, quiet);
    Ok(())
}

/// Delete cached backups of the document at `path` above the retention limit
pub fn handle_prune(path: &Path, settings: &Settings) -> CacheResult<()> {
    let event = SaveEvent::new(path)?;
    let rotator = event.rotator(settings);
    let deleted = rotator.prune(event.working_dir(), event.document_name())?;

    if deleted.is_empty() {
        println!(
            "Nothing to prune: {} keeps at most {} backup(s).",
            rotator.cache_dir(event.working_dir()).display(),
            settings.retention_limit
        );
        return Ok(());
    }

    for path in &deleted {
        println!("Deleted: {}", path.display());
    }
    println!("Pruned {} backup(s).", deleted.len());
    Ok(())
}

fn print_report(report: &RotationReport, quiet: bool) {
    if !quiet {
        println!("{}", report.summary());
    }
}
