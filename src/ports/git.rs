//! Git repository port for remote and branch queries.

use std::path::Path;

use crate::error::UpstreamRef;

/// A configured git remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Fetch URL as configured.
    pub url: String,
}

/// Provides read access to local git repositories.
///
/// Every query names the repository root explicitly so one adapter can
/// serve all folders.
pub trait GitRepo: Send + Sync {
    /// Lists the remotes configured for the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a git repository or git fails.
    fn remotes(
        &self,
        root: &Path,
    ) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the checked-out branch name, or `None` when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved.
    fn current_branch(
        &self,
        root: &Path,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the upstream tracked by `branch`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch configuration cannot be read.
    fn upstream(
        &self,
        root: &Path,
        branch: &str,
    ) -> Result<Option<UpstreamRef>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the remote-tracking ref for `upstream` exists locally.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be queried.
    fn remote_branch_exists(
        &self,
        root: &Path,
        upstream: &UpstreamRef,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
