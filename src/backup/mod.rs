//! Backup rotation for savecache
//!
//! Moves the numbered backups an editor leaves next to a document into a
//! cache subfolder, keeping at most a configured number of them.
//!
//! # Architecture
//!
//! - `BackupScheme`: names slots and recognises backup files
//! - `BackupRotator`: relocates, shifts and evicts backups
//!
//! # Slot layout
//!
//! A backup's numeric suffix is its slot. Slot 1 is the newest generation;
//! the highest slot holds the oldest backup still retained. When an incoming
//! backup lands on an occupied slot, the occupants move up one slot each and
//! anything pushed past the retention limit is deleted.
//!
//! # Example
//!
//! ```rust,ignore
//! use savecache::backup::{BackupRotator, RotationConfig};
//!
//! let rotator = BackupRotator::new(RotationConfig {
//!     retention_limit: 3,
//!     ..RotationConfig::default()
//! });
//! let report = rotator.rotate(Path::new("/projects/scene"), "scene")?;
//! println!("{}", report.summary());
//! ```

mod entry;
mod rotator;

pub use entry::{BackupEntry, BackupInfo, BackupScheme, DEFAULT_EXTENSION};
pub use rotator::{rotate, BackupRotator, RotationConfig, RotationReport};
