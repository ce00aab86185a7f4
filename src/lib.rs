//! savecache - keep an editor's numbered backups in a cache folder
//!
//! Editors that save incremental backups leave `scene.blend1`,
//! `scene.blend2`, ... next to the document. This crate moves them into a
//! subfolder of the working directory and keeps at most a configured number
//! of them, discarding the oldest.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `backup`: naming scheme and the index-rotation algorithm
//! - `hook`: save-event handling for editor integration
//! - `config`: configuration and path management
//! - `error`: custom error types
//! - `cli`: command-line handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use savecache::hook::{SaveEvent, SaveHook};
//! use savecache::config::SaveCachePaths;
//!
//! let hook = SaveHook::new(SaveCachePaths::new()?);
//! let report = hook.handle(&SaveEvent::new("/projects/scene.blend")?)?;
//! println!("{}", report.summary());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod hook;

pub use backup::rotate;
pub use error::CacheError;
