//! Service context bundling all port trait objects.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::live::{LiveCredentialStore, LiveGitRepo, MemoryContextSink};
use crate::config::Config;
use crate::folder::GitFolderManager;
use crate::ports::{ContextSink, CredentialStore, FolderManager, GitRepo};
use crate::registry::RepositoriesRegistry;

/// Bundles the port objects shared by folder managers and the registry.
///
/// Build order is fixed: this context first, then the folder managers
/// ([`ServiceContext::folder_managers`]), then the registry over them
/// ([`ServiceContext::registry`]).
pub struct ServiceContext {
    /// Configuration the context was built from.
    pub config: Config,
    /// Git access for every folder.
    pub git: Arc<dyn GitRepo>,
    /// Credential store shared by every folder and binding.
    pub credentials: Arc<dyn CredentialStore>,
    /// Receives host context updates.
    pub context_sink: Arc<dyn ContextSink>,
}

impl ServiceContext {
    /// Creates a live context: git CLI, environment token, in-memory context.
    #[must_use]
    pub fn live(config: Config) -> Self {
        let credentials = Arc::new(LiveCredentialStore::new(&config));
        Self {
            config,
            git: Arc::new(LiveGitRepo),
            credentials,
            context_sink: Arc::new(MemoryContextSink::new()),
        }
    }

    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn with_ports(
        config: Config,
        git: Arc<dyn GitRepo>,
        credentials: Arc<dyn CredentialStore>,
        context_sink: Arc<dyn ContextSink>,
    ) -> Self {
        Self { config, git, credentials, context_sink }
    }

    /// Creates one folder manager per root, in the given order.
    #[must_use]
    pub fn folder_managers(&self, roots: &[PathBuf]) -> Vec<Arc<GitFolderManager>> {
        roots
            .iter()
            .map(|root| {
                Arc::new(GitFolderManager::new(
                    root,
                    Arc::clone(&self.git),
                    Arc::clone(&self.credentials),
                    &self.config,
                ))
            })
            .collect()
    }

    /// Builds the registry over `folders`.
    #[must_use]
    pub fn registry(&self, folders: &[Arc<GitFolderManager>]) -> RepositoriesRegistry {
        let managers: Vec<Arc<dyn FolderManager>> = folders
            .iter()
            .map(|folder| Arc::clone(folder) as Arc<dyn FolderManager>)
            .collect();
        RepositoriesRegistry::new(
            managers,
            Arc::clone(&self.credentials),
            Some(Arc::clone(&self.context_sink)),
        )
    }
}
