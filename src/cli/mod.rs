//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the rotation layer.

pub mod list;
pub mod rotate;

pub use list::handle_list;
pub use rotate::{handle_on_save, handle_prune, handle_rotate};
