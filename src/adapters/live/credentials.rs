//! Live adapter for the `CredentialStore` port backed by an environment token.

use std::env;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::ports::credentials::{CredentialFuture, CredentialStore, Session};

/// Reads the forge token from the environment variable named in [`Config`].
///
/// A session is restored silently at construction when the token is present.
pub struct LiveCredentialStore {
    token_env: String,
    account: Option<String>,
    session: Mutex<Option<Session>>,
}

impl LiveCredentialStore {
    /// Creates the store and restores a session if a token is available.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let store = Self {
            token_env: config.token_env.clone(),
            account: config.account.clone(),
            session: Mutex::new(None),
        };
        let restored = store.read_session();
        debug!(
            restored = restored.is_some(),
            token_env = %store.token_env,
            "credential store created"
        );
        *store.session.lock().unwrap_or_else(PoisonError::into_inner) = restored;
        store
    }

    fn read_session(&self) -> Option<Session> {
        let token = env::var(&self.token_env).ok().filter(|token| !token.trim().is_empty())?;
        Some(Session {
            id: Uuid::new_v4(),
            account: self.account.clone().unwrap_or_else(|| "unknown".to_string()),
            token,
            created_at: Utc::now(),
        })
    }
}

impl CredentialStore for LiveCredentialStore {
    fn is_authenticated(&self) -> bool {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn reset(&self) -> CredentialFuture<'_, ()> {
        Box::pin(async move {
            let dropped = self.session.lock().unwrap_or_else(PoisonError::into_inner).take();
            debug!(had_session = dropped.is_some(), "credential cache reset");
            Ok(())
        })
    }

    fn login(&self) -> CredentialFuture<'_, Option<Session>> {
        Box::pin(async move {
            let mut cached = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            if cached.is_none() {
                *cached = self.read_session();
            }
            if cached.is_none() {
                info!(token_env = %self.token_env, "no forge token available");
            }
            Ok(cached.clone())
        })
    }
}
