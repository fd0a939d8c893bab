//! Command dispatch and handlers.

pub mod auth;
pub mod check;
pub mod owner;
pub mod status;
pub mod text;

use std::env;
use std::future::Future;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// Loads `.env`, the configuration, and logging before building a live
/// [`ServiceContext`].
///
/// # Errors
///
/// Returns an error string if configuration fails or the handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    dotenvy::dotenv().ok();
    let config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    crate::logging::init(&config, cli.verbose);

    let ctx = ServiceContext::live(config);
    dispatch_with_context(&cli.command, &ctx)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Status { folders, json } => status::run(ctx, &resolve_roots(folders)?, *json),
        Command::Owner { url, folders } => owner::run(ctx, url, &resolve_roots(folders)?),
        Command::Check { folders } => check::run(ctx, &resolve_roots(folders)?),
        Command::Classify { label } => {
            text::classify(label);
            Ok(())
        }
        Command::Split { message } => text::split(message.as_deref()),
        Command::Login => auth::login(ctx),
        Command::Logout => auth::logout(ctx),
    }
}

/// Folders named on the command line, or the current directory.
fn resolve_roots(folders: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    if !folders.is_empty() {
        return Ok(folders.to_vec());
    }
    let cwd = env::current_dir().map_err(|e| format!("Failed to read current directory: {e}"))?;
    Ok(vec![cwd])
}

/// Runs `future` to completion on a current-thread runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}
