//! Error types for repository discovery and the CLI surface.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by folder managers and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The repository is in a state that blocks pull-request work.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A git query through the git port failed.
    #[error("git query failed in {}: {source}", .repository.display())]
    Git {
        /// Root of the repository that was queried.
        repository: PathBuf,
        /// Error reported by the git port.
        #[source]
        source: PortError,
    },

    /// The configuration file could not be read.
    #[error("Configuration error: failed to read {}: {source}", .path.display())]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema.
    #[error("Configuration error: {}: {source}", .path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub(crate) fn git(repository: &Path, source: PortError) -> Self {
        Self::Git { repository: repository.to_path_buf(), source }
    }
}

/// A repository state that prevents pull-request work on a folder.
///
/// Each variant carries the offending data; the message is rendered by
/// `Display` from those fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The repository has no remotes pointing at a known forge host.
    #[error("{} has no forge remotes", .repository.display())]
    NoRemotes {
        /// Root of the repository.
        repository: PathBuf,
    },

    /// HEAD is not attached to a named branch.
    #[error("{} has a detached HEAD (create a branch first)", .repository.display())]
    DetachedHead {
        /// Root of the repository.
        repository: PathBuf,
    },

    /// The current branch's upstream is unusable.
    #[error("The upstream ref {upstream} for branch {branch} {problem}.")]
    BadUpstream {
        /// Root of the repository.
        repository: PathBuf,
        /// Checked-out branch.
        branch: String,
        /// Upstream tracked by the branch.
        upstream: UpstreamRef,
        /// What is wrong with the upstream.
        problem: UpstreamProblem,
    },
}

impl RepositoryError {
    /// Root of the repository the error was raised for.
    #[must_use]
    pub fn repository(&self) -> &Path {
        match self {
            Self::NoRemotes { repository }
            | Self::DetachedHead { repository }
            | Self::BadUpstream { repository, .. } => repository,
        }
    }

    /// Branch involved, when the error concerns one.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::BadUpstream { branch, .. } => Some(branch),
            _ => None,
        }
    }

    /// Upstream ref involved, when the error concerns one.
    #[must_use]
    pub fn upstream(&self) -> Option<&UpstreamRef> {
        match self {
            Self::BadUpstream { upstream, .. } => Some(upstream),
            _ => None,
        }
    }
}

/// A `<remote>/<branch>` tracking reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRef {
    /// Remote name, e.g. `origin`.
    pub remote: String,
    /// Branch name on the remote.
    pub branch: String,
}

impl fmt::Display for UpstreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// What is wrong with an upstream ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamProblem {
    /// The tracked remote is not on a forge host.
    NotForgeRemote,
    /// The tracked remote branch no longer exists.
    Deleted,
}

impl fmt::Display for UpstreamProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotForgeRemote => "is not a forge repository",
            Self::Deleted => "has been deleted",
        };
        f.write_str(text)
    }
}
