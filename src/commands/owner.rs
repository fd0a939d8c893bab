//! `owner`: route a remote URL to the folder that owns it.

use std::path::PathBuf;

use crate::context::ServiceContext;

/// Run the `owner` command.
///
/// Folders that fail to load are skipped with a warning.
///
/// # Errors
///
/// Currently infallible; the signature matches the other handlers.
pub fn run(ctx: &ServiceContext, url: &str, roots: &[PathBuf]) -> Result<(), String> {
    let managers = ctx.folder_managers(roots);
    let registry = ctx.registry(&managers);
    for manager in &managers {
        if let Err(e) = manager.load() {
            tracing::warn!(error = %e, "skipping folder");
        }
    }

    match registry.find_owning_manager(url) {
        Some(owner) => println!("{}", owner.root().display()),
        None => println!("No folder owns {url}"),
    }
    Ok(())
}
