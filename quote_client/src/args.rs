//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use quote_common::net::{DEFAULT_SERVER_URL, SYNC_INTERVAL_SECS};
use quote_common::transfer::EXPORT_FILE_NAME;
use quote_sync::SyncConfig;

/// Directory name used under the platform data directory.
const APP_DIR: &str = "quote_keeper";

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the durable slots. Defaults to the platform data directory.
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the quote server.
    #[clap(long, global = true, default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Never contact the quote server.
    #[clap(long, global = true)]
    pub offline: bool,

    /// Seconds between periodic syncs in the shell.
    #[clap(long, global = true, default_value_t = SYNC_INTERVAL_SECS)]
    pub sync_interval: u64,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Client subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every stored quote.
    List,
    /// Add a quote and send it to the server.
    Add {
        /// Quote text.
        #[clap(long)]
        text: String,
        /// Quote category.
        #[clap(long)]
        category: String,
    },
    /// Remove the quote with the given id.
    Remove {
        /// Quote id as shown by `list`.
        id: u64,
    },
    /// Show a random quote.
    Random,
    /// Select a category ("all" for every quote) and show a random quote from it.
    Filter {
        /// Category name or "all".
        category: String,
    },
    /// Show the known categories.
    Categories,
    /// Export all quotes to a JSON file.
    Export {
        /// Destination file.
        #[clap(long, default_value = EXPORT_FILE_NAME)]
        path: PathBuf,
    },
    /// Append the quotes of a JSON file.
    Import {
        /// JSON file holding an array of quotes.
        path: PathBuf,
    },
    /// Sync with the server once.
    Sync,
    /// Start an interactive session with periodic sync.
    Shell,
}

impl Args {
    /// Data directory to use, falling back to the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
        })
    }

    /// Sync settings with the command-line overrides applied.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            server_url: self.server_url.trim().to_string(),
            interval: Duration::from_secs(self.sync_interval.max(1)),
            ..SyncConfig::default()
        }
    }
}
