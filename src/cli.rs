//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `prbridge`.
#[derive(Debug, Parser)]
#[command(
    name = "prbridge",
    version,
    about = "Route pull-request items to local repository folders"
)]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show each folder's forge repositories and the registry state.
    Status {
        /// Repository folders (defaults to the current directory).
        folders: Vec<PathBuf>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Find the folder that owns a forge remote URL.
    Owner {
        /// Remote URL of the item.
        url: String,
        /// Repository folders (defaults to the current directory).
        folders: Vec<PathBuf>,
    },
    /// Check that each folder's branch and upstream are usable.
    Check {
        /// Repository folders (defaults to the current directory).
        folders: Vec<PathBuf>,
    },
    /// Classify a timeline event label.
    Classify {
        /// Event label, e.g. `committed`.
        label: String,
    },
    /// Split a commit message into title and body.
    Split {
        /// Message text; read from stdin when omitted.
        #[arg(long)]
        message: Option<String>,
    },
    /// Establish a session from the configured token.
    Login,
    /// Clear cached credentials.
    Logout,
}
