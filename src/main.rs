use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use savecache::backup::DEFAULT_EXTENSION;
use savecache::cli::{handle_list, handle_on_save, handle_prune, handle_rotate};
use savecache::config::{paths::SaveCachePaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "savecache",
    version,
    about = "Move numbered editor backups into a cache folder",
    long_about = "savecache relocates the numbered backups an editor writes next to a \
                  document (scene.blend1, scene.blend2, ...) into a cache subfolder, \
                  keeping at most a configured number of them and discarding the oldest."
)]
struct Cli {
    /// Do not print the status line
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotate backups of a document in a directory
    Rotate {
        /// Working directory holding the backups
        dir: PathBuf,
        /// Document base name without extension or index
        document: String,
        /// Retention limit (0 disables rotation)
        #[arg(short, long, env = "SAVECACHE_RETENTION")]
        limit: Option<u32>,
        /// Primary extension of the document
        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Handle a save event for a document (editor hook entry point)
    #[command(alias = "save")]
    OnSave {
        /// Path of the document that was saved
        path: PathBuf,
        /// Retention limit (0 disables rotation)
        #[arg(short, long, env = "SAVECACHE_RETENTION")]
        limit: Option<u32>,
    },

    /// List cached backups of a document
    #[command(alias = "ls")]
    List {
        /// Path of the document
        path: PathBuf,
    },

    /// Delete cached backups above the retention limit
    Prune {
        /// Path of the document
        path: PathBuf,
        /// Retention limit to enforce
        #[arg(short, long, env = "SAVECACHE_RETENTION")]
        limit: Option<u32>,
    },

    /// Write the default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = SaveCachePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let quiet = cli.quiet || !settings.print_info;

    match cli.command {
        Some(Commands::Rotate {
            dir,
            document,
            limit,
            ext,
        }) => {
            if let Some(limit) = limit {
                settings.retention_limit = limit;
            }
            let mut config = settings.rotation_config(DEFAULT_EXTENSION);
            if let Some(ext) = ext {
                config.extension = ext;
            }
            handle_rotate(&dir, &document, config, quiet)?;
        }
        Some(Commands::OnSave { path, limit }) => {
            if let Some(limit) = limit {
                settings.retention_limit = limit;
            }
            handle_on_save(&path, &settings, quiet)?;
        }
        Some(Commands::List { path }) => {
            handle_list(&path, &settings)?;
        }
        Some(Commands::Prune { path, limit }) => {
            if let Some(limit) = limit {
                settings.retention_limit = limit;
            }
            handle_prune(&path, &settings)?;
        }
        Some(Commands::Init { force }) => {
            if paths.is_initialized() && !force {
                println!(
                    "Settings already exist at {}",
                    paths.settings_file().display()
                );
                println!("Run again with --force to overwrite them.");
                return Ok(());
            }
            let defaults = Settings::default();
            defaults.save(&paths)?;
            println!("Settings written to {}", paths.settings_file().display());
        }
        Some(Commands::Config) => {
            println!("savecache Configuration");
            println!("=======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!(
                "Settings file:    {}{}",
                paths.settings_file().display(),
                if paths.is_initialized() { "" } else { " (not created)" }
            );
            println!();
            println!("Settings:");
            println!("  Retention limit:   {}", settings.retention_limit);
            println!("  Cache folder name: {}", settings.cache_folder_name);
            println!(
                "  Extension:         {}",
                settings.extension.as_deref().unwrap_or("(from document)")
            );
            println!("  Print info:        {}", settings.print_info);
        }
        None => {
            println!("savecache - keep editor backups in a cache folder");
            println!();
            println!("Run 'savecache --help' for usage information.");
            println!("Run 'savecache on-save <FILE>' after each save.");
        }
    }

    Ok(())
}

/// Log to stderr; `SAVECACHE_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SAVECACHE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("savecache={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
