//! Git-backed folder manager.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, RepositoryError, Result, UpstreamProblem, UpstreamRef};
use crate::event::{Emitter, Listener, Subscription};
use crate::forge::{ForgeRepository, Remote};
use crate::ports::{CredentialStore, FolderManager, GitRepo};
use crate::state::RegistryState;

/// Manages one repository folder through the git port.
pub struct GitFolderManager {
    root: PathBuf,
    git: Arc<dyn GitRepo>,
    credentials: Arc<dyn CredentialStore>,
    config: Config,
    repositories: Mutex<Vec<ForgeRepository>>,
    loaded: Emitter<RegistryState>,
}

impl GitFolderManager {
    /// Creates a manager for `root`. Nothing is loaded until [`load`] runs.
    ///
    /// [`load`]: GitFolderManager::load
    #[must_use]
    pub fn new(
        root: &Path,
        git: Arc<dyn GitRepo>,
        credentials: Arc<dyn CredentialStore>,
        config: &Config,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            git,
            credentials,
            config: config.clone(),
            repositories: Mutex::new(Vec::new()),
            loaded: Emitter::new(),
        }
    }

    /// Discovers the folder's forge remotes and fires the load notification.
    ///
    /// The state fired is `Ready` when the credential store holds a session
    /// and `NeedsAuthentication` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Git`] if the remotes cannot be listed; no
    /// notification fires in that case.
    pub fn load(&self) -> Result<RegistryState> {
        let remotes = self.git.remotes(&self.root).map_err(|e| {
            warn!(root = %self.root.display(), error = %e, "failed to list remotes");
            Error::git(&self.root, e)
        })?;
        let repositories: Vec<ForgeRepository> = remotes
            .iter()
            .filter_map(|remote| Remote::parse(&remote.name, &remote.url))
            .filter(|remote| self.config.is_forge_host(&remote.host))
            .map(|remote| ForgeRepository::new(remote, Arc::clone(&self.credentials)))
            .collect();
        info!(
            root = %self.root.display(),
            remotes = remotes.len(),
            forge_repositories = repositories.len(),
            "repositories loaded"
        );
        *self.repositories.lock().unwrap_or_else(PoisonError::into_inner) = repositories;

        let state = if self.credentials.is_authenticated() {
            RegistryState::Ready
        } else {
            RegistryState::NeedsAuthentication
        };
        self.loaded.fire(&state);
        Ok(state)
    }

    /// Returns the forge repositories, failing when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NoRemotes`] if no remote points at a forge host.
    pub fn require_forge_repositories(
        &self,
    ) -> std::result::Result<Vec<ForgeRepository>, RepositoryError> {
        let repositories = self.forge_repositories();
        if repositories.is_empty() {
            return Err(RepositoryError::NoRemotes { repository: self.root.clone() });
        }
        Ok(repositories)
    }

    /// Checks that the current branch can be used for a pull request.
    ///
    /// Returns the branch's upstream, or `None` when the branch tracks
    /// nothing yet.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DetachedHead`] when HEAD is detached,
    /// [`RepositoryError::BadUpstream`] when the upstream is not a forge
    /// remote or its branch is gone, and [`Error::Git`] when git fails.
    pub fn check_upstream(&self) -> Result<Option<UpstreamRef>> {
        let git_error = |e| Error::git(&self.root, e);
        let Some(branch) = self.git.current_branch(&self.root).map_err(git_error)? else {
            return Err(RepositoryError::DetachedHead { repository: self.root.clone() }.into());
        };
        let Some(upstream) = self.git.upstream(&self.root, &branch).map_err(git_error)? else {
            return Ok(None);
        };

        let bad = |problem| RepositoryError::BadUpstream {
            repository: self.root.clone(),
            branch: branch.clone(),
            upstream: upstream.clone(),
            problem,
        };
        let on_forge = self
            .forge_repositories()
            .iter()
            .any(|repository| repository.remote().remote_name == upstream.remote);
        if !on_forge {
            return Err(bad(UpstreamProblem::NotForgeRemote).into());
        }
        if !self.git.remote_branch_exists(&self.root, &upstream).map_err(git_error)? {
            return Err(bad(UpstreamProblem::Deleted).into());
        }
        Ok(Some(upstream))
    }
}

impl FolderManager for GitFolderManager {
    fn root(&self) -> &Path {
        &self.root
    }

    fn forge_repositories(&self) -> Vec<ForgeRepository> {
        self.repositories.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn on_did_load_repositories(&self, listener: Listener<RegistryState>) -> Subscription {
        self.loaded.subscribe(move |state| listener(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortError;
    use crate::ports::{CredentialFuture, GitRemote, Session};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeGit {
        remotes: Vec<(&'static str, &'static str)>,
        branch: Option<&'static str>,
        upstream: Option<(&'static str, &'static str)>,
        remote_branch_exists: bool,
        broken: bool,
    }

    impl GitRepo for FakeGit {
        fn remotes(&self, _root: &Path) -> std::result::Result<Vec<GitRemote>, PortError> {
            if self.broken {
                return Err("not a git repository".into());
            }
            Ok(self
                .remotes
                .iter()
                .map(|(name, url)| GitRemote { name: (*name).into(), url: (*url).into() })
                .collect())
        }

        fn current_branch(&self, _root: &Path) -> std::result::Result<Option<String>, PortError> {
            Ok(self.branch.map(String::from))
        }

        fn upstream(
            &self,
            _root: &Path,
            _branch: &str,
        ) -> std::result::Result<Option<UpstreamRef>, PortError> {
            Ok(self.upstream.map(|(remote, branch)| UpstreamRef {
                remote: remote.into(),
                branch: branch.into(),
            }))
        }

        fn remote_branch_exists(
            &self,
            _root: &Path,
            _upstream: &UpstreamRef,
        ) -> std::result::Result<bool, PortError> {
            Ok(self.remote_branch_exists)
        }
    }

    struct StaticCredentials(AtomicBool);

    impl CredentialStore for StaticCredentials {
        fn is_authenticated(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }

        fn reset(&self) -> CredentialFuture<'_, ()> {
            Box::pin(async move { Ok(()) })
        }

        fn login(&self) -> CredentialFuture<'_, Option<Session>> {
            Box::pin(async move { Ok(None) })
        }
    }

    fn manager(git: FakeGit, authenticated: bool) -> GitFolderManager {
        GitFolderManager::new(
            Path::new("/work/app"),
            Arc::new(git),
            Arc::new(StaticCredentials(AtomicBool::new(authenticated))),
            &Config::default(),
        )
    }

    fn two_remotes() -> Vec<(&'static str, &'static str)> {
        vec![
            ("origin", "git@github.com:acme/app.git"),
            ("mirror", "https://gitlab.com/acme/app.git"),
        ]
    }

    #[test]
    fn load_keeps_only_forge_remotes_and_fires_state() {
        let folder = manager(FakeGit { remotes: two_remotes(), ..FakeGit::default() }, false);
        let fired = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&fired);
        let _sub = folder.on_did_load_repositories(Arc::new(move |state: &RegistryState| {
            seen.lock().unwrap().push(*state);
        }));

        let state = folder.load().unwrap();

        assert_eq!(state, RegistryState::NeedsAuthentication);
        assert_eq!(*fired.lock().unwrap(), vec![RegistryState::NeedsAuthentication]);
        let repositories = folder.forge_repositories();
        assert_eq!(repositories.len(), 1);
        assert_eq!(repositories[0].remote().remote_name, "origin");
    }

    #[test]
    fn authenticated_load_is_ready() {
        let folder = manager(FakeGit { remotes: two_remotes(), ..FakeGit::default() }, true);
        assert_eq!(folder.load().unwrap(), RegistryState::Ready);
    }

    #[test]
    fn git_failure_is_reported_without_notification() {
        let folder = manager(FakeGit { broken: true, ..FakeGit::default() }, true);
        let fired = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&fired);
        let _sub = folder.on_did_load_repositories(Arc::new(move |_: &RegistryState| {
            seen.store(true, Ordering::SeqCst);
        }));

        let err = folder.load().unwrap_err();
        assert!(matches!(err, Error::Git { .. }));
        assert!(err.to_string().contains("not a git repository"));
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn no_forge_remotes_is_a_typed_error() {
        let folder = manager(
            FakeGit {
                remotes: vec![("origin", "https://gitlab.com/a/b.git")],
                ..FakeGit::default()
            },
            true,
        );
        folder.load().unwrap();
        let err = folder.require_forge_repositories().unwrap_err();
        assert_eq!(err, RepositoryError::NoRemotes { repository: PathBuf::from("/work/app") });
    }

    #[test]
    fn detached_head_is_reported() {
        let folder = manager(FakeGit { remotes: two_remotes(), ..FakeGit::default() }, true);
        folder.load().unwrap();
        let err = folder.check_upstream().unwrap_err();
        assert!(matches!(err, Error::Repository(RepositoryError::DetachedHead { .. })));
    }

    #[test]
    fn branch_without_upstream_is_fine() {
        let folder = manager(
            FakeGit { remotes: two_remotes(), branch: Some("feature"), ..FakeGit::default() },
            true,
        );
        folder.load().unwrap();
        assert_eq!(folder.check_upstream().unwrap(), None);
    }

    #[test]
    fn upstream_on_non_forge_remote_is_bad() {
        let folder = manager(
            FakeGit {
                remotes: two_remotes(),
                branch: Some("feature"),
                upstream: Some(("mirror", "feature")),
                remote_branch_exists: true,
                ..FakeGit::default()
            },
            true,
        );
        folder.load().unwrap();
        let Err(Error::Repository(err)) = folder.check_upstream() else {
            panic!("expected a repository error");
        };
        assert_eq!(err.branch(), Some("feature"));
        assert_eq!(err.upstream().map(|u| u.remote.as_str()), Some("mirror"));
        assert!(matches!(
            err,
            RepositoryError::BadUpstream { problem: UpstreamProblem::NotForgeRemote, .. }
        ));
    }

    #[test]
    fn deleted_upstream_branch_is_bad() {
        let folder = manager(
            FakeGit {
                remotes: two_remotes(),
                branch: Some("feature"),
                upstream: Some(("origin", "feature")),
                remote_branch_exists: false,
                ..FakeGit::default()
            },
            true,
        );
        folder.load().unwrap();
        let err = folder.check_upstream().unwrap_err();
        assert_eq!(
            err.to_string(),
            "The upstream ref origin/feature for branch feature has been deleted."
        );
    }

    #[test]
    fn healthy_upstream_is_returned() {
        let folder = manager(
            FakeGit {
                remotes: two_remotes(),
                branch: Some("feature"),
                upstream: Some(("origin", "feature")),
                remote_branch_exists: true,
                ..FakeGit::default()
            },
            true,
        );
        folder.load().unwrap();
        let upstream = folder.check_upstream().unwrap().unwrap();
        assert_eq!(upstream.to_string(), "origin/feature");
    }
}
