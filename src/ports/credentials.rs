//! Credential store port for forge sessions.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Boxed future type alias used by [`CredentialStore`] to keep the trait dyn-compatible.
pub type CredentialFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// An authenticated forge session.
#[derive(Clone)]
pub struct Session {
    /// Locally assigned session identifier.
    pub id: Uuid,
    /// Account the session belongs to.
    pub account: String,
    /// Access token. Left out of `Debug` output.
    pub token: String,
    /// When the session was established.
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("account", &self.account)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Owns the session shared by every folder manager and binding.
///
/// Implementations must tolerate repeated calls from the same caller; a
/// second `login` or `reset` may start before the first one finishes.
pub trait CredentialStore: Send + Sync {
    /// Returns `true` if a usable session is currently cached.
    fn is_authenticated(&self) -> bool;

    /// Drops any cached session and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached credentials cannot be cleared.
    fn reset(&self) -> CredentialFuture<'_, ()>;

    /// Establishes a session, returning `None` when none could be obtained.
    ///
    /// # Errors
    ///
    /// Returns an error if the login attempt itself fails.
    fn login(&self) -> CredentialFuture<'_, Option<Session>>;
}
