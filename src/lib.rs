//! Core library entry for `prbridge`.
//!
//! The centre of the crate is [`registry::RepositoriesRegistry`], which
//! tracks one [`ports::FolderManager`] per opened repository folder, derives
//! an aggregate [`state::RegistryState`], and routes forge items back to the
//! folder that owns them.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod folder;
pub mod forge;
pub mod logging;
pub mod ports;
pub mod registry;
pub mod state;
pub mod text;

pub use error::{Error, RepositoryError, Result};
pub use registry::RepositoriesRegistry;
pub use state::RegistryState;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_classify() {
        let result = run(["prbridge", "classify", "reviewed"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["prbridge", "unknown"]);
        assert!(result.is_err());
    }
}
