//! `check`: verify each folder can be used for pull-request work.

use std::path::PathBuf;

use crate::context::ServiceContext;
use crate::error::Error;
use crate::ports::FolderManager;

/// Run the `check` command.
///
/// # Errors
///
/// Returns an error string naming how many folders have problems.
pub fn run(ctx: &ServiceContext, roots: &[PathBuf]) -> Result<(), String> {
    let managers = ctx.folder_managers(roots);
    let mut failures = 0usize;

    for manager in &managers {
        let root = manager.root().display().to_string();
        let outcome = manager
            .load()
            .and_then(|_| manager.require_forge_repositories().map_err(Error::from))
            .and_then(|_| manager.check_upstream());
        match outcome {
            Ok(Some(upstream)) => println!("{root}: ok (tracking {upstream})"),
            Ok(None) => println!("{root}: ok (no upstream yet)"),
            Err(e) => {
                failures += 1;
                println!("{root}: {e}");
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} folder(s) cannot be used for pull requests"));
    }
    Ok(())
}
