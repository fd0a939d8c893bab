//! Folder manager port: one per opened repository folder.

use std::path::Path;

use crate::event::{Listener, Subscription};
use crate::forge::ForgeRepository;
use crate::state::RegistryState;

/// Owns one local repository folder's bindings to forge remotes.
pub trait FolderManager: Send + Sync {
    /// Root directory of the repository.
    fn root(&self) -> &Path;

    /// Forge repositories known for this folder, in remote order.
    fn forge_repositories(&self) -> Vec<ForgeRepository>;

    /// Registers a listener fired whenever this folder finishes loading its
    /// repositories, carrying the lifecycle state it reached.
    fn on_did_load_repositories(&self, listener: Listener<RegistryState>) -> Subscription;
}
