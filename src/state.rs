//! Aggregate lifecycle state of the repository registry.

use std::fmt;

use serde::Serialize;

/// Coarse readiness of the registry.
///
/// `Initializing` is read downstream as "re-check every folder".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RegistryState {
    /// Folders are still being discovered or must be re-evaluated.
    #[default]
    Initializing,
    /// Repositories were found but no usable session exists.
    NeedsAuthentication,
    /// Repositories are loaded and a session is available.
    Ready,
}

impl RegistryState {
    /// Stable string form published to the host context.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::NeedsAuthentication => "NeedsAuthentication",
            Self::Ready => "Ready",
        }
    }
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
