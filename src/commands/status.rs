//! `status`: load every folder and report its forge repositories.

use std::path::PathBuf;

use serde::Serialize;

use crate::context::ServiceContext;
use crate::ports::FolderManager;
use crate::state::RegistryState;

/// One folder's line in the report.
#[derive(Debug, Serialize)]
pub struct FolderReport {
    /// Repository root.
    pub root: PathBuf,
    /// `owner/name` of each forge repository.
    pub repositories: Vec<String>,
    /// Load failure, if any.
    pub error: Option<String>,
}

/// Full `status` report.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Registry state after all folders loaded.
    pub state: RegistryState,
    /// Per-folder results, in argument order.
    pub folders: Vec<FolderReport>,
}

/// Builds the status report for `roots`.
#[must_use]
pub fn collect(ctx: &ServiceContext, roots: &[PathBuf]) -> StatusReport {
    let managers = ctx.folder_managers(roots);
    let registry = ctx.registry(&managers);

    let folders = managers
        .iter()
        .map(|manager| {
            let error = manager.load().err().map(|e| e.to_string());
            let repositories = manager
                .forge_repositories()
                .iter()
                .map(|repository| repository.remote().full_name())
                .collect();
            FolderReport { root: manager.root().to_path_buf(), repositories, error }
        })
        .collect();

    StatusReport { state: registry.state(), folders }
}

/// Run the `status` command.
///
/// # Errors
///
/// Returns an error string if the JSON report cannot be serialized.
pub fn run(ctx: &ServiceContext, roots: &[PathBuf], json: bool) -> Result<(), String> {
    let report = collect(ctx, roots);
    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize status report: {e}"))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("State: {}", report.state);
    for folder in &report.folders {
        println!("{}", folder.root.display());
        if let Some(error) = &folder.error {
            println!("  error: {error}");
        } else if folder.repositories.is_empty() {
            println!("  (no forge repositories)");
        }
        for repository in &folder.repositories {
            println!("  {repository}");
        }
    }
    Ok(())
}
