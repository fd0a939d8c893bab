//! Registry of every opened repository folder.
//!
//! The registry aggregates the folder managers of a session, derives one
//! lifecycle state from their load notifications, owns the shared credential
//! store handle, and routes forge items back to the folder that owns them.
//!
//! Construction order: the credential store and folder managers must exist
//! before the registry is built over them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info};

use crate::event::{Emitter, Subscription};
use crate::forge::{
    normalize_remote_url, ForgeItem, ForgeRepository, Remote, FORGE_HOST, FORGE_WEB_BASE,
};
use crate::ports::{ContextSink, CredentialStore, FolderManager};
use crate::state::RegistryState;

/// Context key under which the registry state is published to the host.
pub const REPOS_MANAGER_STATE_CONTEXT: &str = "ReposManagerStateContext";

/// Error returned by credential operations, passed through unchanged.
pub type CredentialError = Box<dyn std::error::Error + Send + Sync>;

/// Payload of the folder-change notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldersChanged {
    /// Roots of folders that were added.
    pub added: Vec<PathBuf>,
    /// Roots of folders that were removed.
    pub removed: Vec<PathBuf>,
}

/// Lifecycle state plus the observers that must hear about changes.
struct StateCell {
    value: Mutex<RegistryState>,
    changed: Emitter<RegistryState>,
    context_sink: Option<Arc<dyn ContextSink>>,
}

impl StateCell {
    fn new(context_sink: Option<Arc<dyn ContextSink>>) -> Self {
        Self { value: Mutex::new(RegistryState::default()), changed: Emitter::new(), context_sink }
    }

    fn get(&self) -> RegistryState {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `next`; returns `false` without notifying when it is unchanged.
    ///
    /// The context sink is written while the value lock is held, so the sink
    /// sees writes in the same order as the stored value. Listeners run after
    /// the lock is released.
    fn set(&self, next: RegistryState) -> bool {
        {
            let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
            if *value == next {
                return false;
            }
            let previous = std::mem::replace(&mut *value, next);
            debug!(%previous, %next, "registry state changed");
            self.publish_context(next);
        }
        self.changed.fire(&next);
        true
    }

    fn publish_context(&self, state: RegistryState) {
        if let Some(sink) = &self.context_sink {
            sink.set_context(REPOS_MANAGER_STATE_CONTEXT, state.as_str());
        }
    }
}

struct FolderEntry {
    manager: Arc<dyn FolderManager>,
    subscription: Subscription,
}

impl FolderEntry {
    fn watch(manager: Arc<dyn FolderManager>, state: &Arc<StateCell>) -> Self {
        let cell: Weak<StateCell> = Arc::downgrade(state);
        let subscription = manager.on_did_load_repositories(Arc::new(move |loaded: &RegistryState| {
            if let Some(cell) = cell.upgrade() {
                cell.set(*loaded);
            }
        }));
        Self { manager, subscription }
    }
}

/// Tracks one folder manager per repository folder and their aggregate state.
///
/// Dropping the registry releases every subscription it holds; [`dispose`]
/// does the same eagerly.
///
/// [`dispose`]: RepositoriesRegistry::dispose
pub struct RepositoriesRegistry {
    folders: Mutex<Vec<FolderEntry>>,
    credentials: Arc<dyn CredentialStore>,
    state: Arc<StateCell>,
    folders_changed: Emitter<FoldersChanged>,
}

impl RepositoriesRegistry {
    /// Builds the registry over `folder_managers`.
    ///
    /// Subscribes to every folder's load notification and publishes the
    /// initial state to `context_sink`. Performs no other I/O.
    #[must_use]
    pub fn new(
        folder_managers: Vec<Arc<dyn FolderManager>>,
        credentials: Arc<dyn CredentialStore>,
        context_sink: Option<Arc<dyn ContextSink>>,
    ) -> Self {
        let state = Arc::new(StateCell::new(context_sink));
        let folders: Vec<FolderEntry> = folder_managers
            .into_iter()
            .map(|manager| FolderEntry::watch(manager, &state))
            .collect();
        state.publish_context(state.get());
        debug!(folders = folders.len(), "repositories registry created");

        Self { folders: Mutex::new(folders), credentials, state, folders_changed: Emitter::new() }
    }

    fn lock_folders(&self) -> MutexGuard<'_, Vec<FolderEntry>> {
        self.folders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the registered folder managers, in registration order.
    #[must_use]
    pub fn folder_managers(&self) -> Vec<Arc<dyn FolderManager>> {
        self.lock_folders().iter().map(|entry| Arc::clone(&entry.manager)).collect()
    }

    /// Registers another folder manager and starts following its loads.
    pub fn add_folder_manager(&self, manager: Arc<dyn FolderManager>) {
        let root = manager.root().to_path_buf();
        let entry = FolderEntry::watch(manager, &self.state);
        self.lock_folders().push(entry);
        debug!(root = %root.display(), "folder manager added");
        self.folders_changed.fire(&FoldersChanged { added: vec![root], removed: Vec::new() });
    }

    /// Removes the folder manager rooted at `root` and releases its
    /// subscription. Returns the removed manager, if any.
    pub fn remove_folder_manager(&self, root: &Path) -> Option<Arc<dyn FolderManager>> {
        let removed = {
            let mut folders = self.lock_folders();
            let index = folders.iter().position(|entry| entry.manager.root() == root)?;
            folders.remove(index)
        };
        let FolderEntry { manager, mut subscription } = removed;
        subscription.dispose();
        debug!(root = %root.display(), "folder manager removed");
        self.folders_changed
            .fire(&FoldersChanged { added: Vec::new(), removed: vec![root.to_path_buf()] });
        Some(manager)
    }

    /// Finds the folder manager that knows the item's forge repository.
    ///
    /// Remote URLs on both sides are compared after
    /// [`normalize_remote_url`]. Returns the first match in registration
    /// order, or `None`.
    pub fn find_owning_manager<I>(&self, item: &I) -> Option<Arc<dyn FolderManager>>
    where
        I: ForgeItem + ?Sized,
    {
        let wanted = normalize_remote_url(item.remote_url());
        self.folder_managers().into_iter().find(|manager| {
            manager
                .forge_repositories()
                .iter()
                .any(|repository| repository.remote().normalized_url() == wanted)
        })
    }

    /// Finds the folder manager whose root contains `path`. When roots nest,
    /// the deepest one wins.
    pub fn manager_for_file(&self, path: &Path) -> Option<Arc<dyn FolderManager>> {
        self.folder_managers()
            .into_iter()
            .filter(|manager| path.starts_with(manager.root()))
            .max_by_key(|manager| manager.root().components().count())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RegistryState {
        self.state.get()
    }

    /// Sets the lifecycle state.
    ///
    /// Writing the current value does nothing. Otherwise the context sink is
    /// updated first, then state listeners are notified once. Returns whether
    /// the state changed.
    pub fn set_state(&self, state: RegistryState) -> bool {
        self.state.set(state)
    }

    /// Registers a listener for lifecycle state changes.
    pub fn on_did_change_state<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RegistryState) + Send + Sync + 'static,
    {
        self.state.changed.subscribe(listener)
    }

    /// Registers a listener for folders being added or removed.
    pub fn on_did_change_folders<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FoldersChanged) + Send + Sync + 'static,
    {
        self.folders_changed.subscribe(listener)
    }

    /// The credential store shared with every folder and binding.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Resets the credential store, then forces the state back to
    /// `Initializing` so every folder is re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns the credential store's error unchanged; the state is left
    /// untouched in that case.
    pub async fn clear_credential_cache(&self) -> Result<(), CredentialError> {
        self.credentials.reset().await?;
        info!("credential cache cleared");
        self.set_state(RegistryState::Initializing);
        Ok(())
    }

    /// Asks the credential store to log in. Returns `true` when a session
    /// came back.
    ///
    /// # Errors
    ///
    /// Returns the credential store's error unchanged.
    pub async fn authenticate(&self) -> Result<bool, CredentialError> {
        let session = self.credentials.login().await?;
        match &session {
            Some(session) => info!(account = %session.account, "authenticated"),
            None => info!("login produced no session"),
        }
        Ok(session.is_some())
    }

    /// Binds `remote` to `credentials`.
    #[must_use]
    pub fn create_repository_binding(
        &self,
        remote: Remote,
        credentials: Arc<dyn CredentialStore>,
    ) -> ForgeRepository {
        ForgeRepository::new(remote, credentials)
    }

    /// Binds the canonical web URL of `owner/name` to this registry's
    /// credential store. The remote is named after the repository.
    #[must_use]
    pub fn create_repository_binding_from_owner_name(
        &self,
        owner: &str,
        name: &str,
    ) -> ForgeRepository {
        let remote = Remote {
            remote_name: name.to_string(),
            url: format!("{FORGE_WEB_BASE}/{owner}/{name}"),
            host: FORGE_HOST.to_string(),
            owner: owner.to_string(),
            repository_name: name.to_string(),
        };
        self.create_repository_binding(remote, Arc::clone(&self.credentials))
    }

    /// Releases every folder subscription. Safe to call more than once.
    pub fn dispose(&self) {
        let mut released = 0;
        for entry in self.lock_folders().iter_mut() {
            if !entry.subscription.is_disposed() {
                entry.subscription.dispose();
                released += 1;
            }
        }
        debug!(released, "repositories registry disposed");
    }
}
