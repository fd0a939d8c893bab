//! Forge remotes, repository bindings, and remote URL normalization.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::ports::CredentialStore;

/// Host of the default forge.
pub const FORGE_HOST: &str = "github.com";

/// Base URL used when a binding is built from an owner and name.
pub const FORGE_WEB_BASE: &str = "https://github.com";

/// A git remote that points at a forge repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Name of the git remote, e.g. `origin`.
    pub remote_name: String,
    /// URL exactly as configured.
    pub url: String,
    /// Host the URL points at.
    pub host: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name without any `.git` suffix.
    pub repository_name: String,
}

impl Remote {
    /// Parses a remote URL into its forge coordinates.
    ///
    /// Accepts `https://`, `http://`, `ssh://`, `git://` and scp-like
    /// (`git@host:owner/name.git`) forms. Returns `None` when the URL has no
    /// host or fewer than two path segments.
    #[must_use]
    pub fn parse(remote_name: &str, url: &str) -> Option<Self> {
        let parsed = Url::parse(&scp_to_ssh(url)).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        let segments: Vec<&str> =
            parsed.path_segments()?.filter(|segment| !segment.is_empty()).collect();
        let [.., owner, name] = segments.as_slice() else {
            return None;
        };
        let repository_name = name.strip_suffix(".git").unwrap_or(*name);
        if repository_name.is_empty() {
            return None;
        }

        Some(Self {
            remote_name: remote_name.to_string(),
            url: url.to_string(),
            host,
            owner: (*owner).to_string(),
            repository_name: repository_name.to_string(),
        })
    }

    /// `owner/name` form of the repository.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository_name)
    }

    /// The URL with its final extension stripped; see [`normalize_remote_url`].
    #[must_use]
    pub fn normalized_url(&self) -> &str {
        normalize_remote_url(&self.url)
    }
}

/// Rewrites `user@host:path` into `ssh://user@host/path`; other input is
/// returned unchanged.
fn scp_to_ssh(url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    match url.split_once(':') {
        Some((authority, path)) if !authority.contains('/') => {
            format!("ssh://{authority}/{}", path.trim_start_matches('/'))
        }
        _ => url.to_string(),
    }
}

/// Strips the extension of the URL's last path segment.
///
/// The extension is everything from the last `.` in the final segment,
/// unless that `.` opens the segment. This is not limited to `.git`:
/// `https://host/o/repo.js` normalizes to `https://host/o/repo`.
///
/// A URL ending in `/` has an empty final segment and is returned as is;
/// trailing slashes are not skipped to find an earlier segment.
#[must_use]
pub fn normalize_remote_url(url: &str) -> &str {
    let segment_start = url.rfind('/').map_or(0, |slash| slash + 1);
    let segment = &url[segment_start..];
    match segment.rfind('.') {
        Some(dot) if dot > 0 => &url[..segment_start + dot],
        _ => url,
    }
}

/// Something that lives in a forge repository, such as an issue or a
/// pull request.
pub trait ForgeItem {
    /// URL of the forge remote the item belongs to.
    fn remote_url(&self) -> &str;
}

impl ForgeItem for str {
    fn remote_url(&self) -> &str {
        self
    }
}

impl ForgeItem for Remote {
    fn remote_url(&self) -> &str {
        &self.url
    }
}

/// A numbered issue or pull request on a forge remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// Issue or pull-request number.
    pub number: u64,
    /// Remote the item lives on.
    pub remote: Remote,
}

impl ForgeItem for IssueRef {
    fn remote_url(&self) -> &str {
        &self.remote.url
    }
}

/// A forge repository bound to the shared credential store.
#[derive(Clone)]
pub struct ForgeRepository {
    remote: Remote,
    credentials: Arc<dyn CredentialStore>,
}

impl ForgeRepository {
    /// Binds `remote` to `credentials`. No network access happens here.
    #[must_use]
    pub fn new(remote: Remote, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { remote, credentials }
    }

    /// The bound remote.
    #[must_use]
    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// The credential store used for requests against this repository.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }
}

impl fmt::Debug for ForgeRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeRepository").field("remote", &self.remote).finish_non_exhaustive()
    }
}
