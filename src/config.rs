//! Runtime configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! environment variables. `.env` files are loaded by the binary before
//! [`Config::load`] runs.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forge::FORGE_HOST;

/// Environment variable naming the config file.
pub const CONFIG_FILE_ENV: &str = "PRBRIDGE_CONFIG";
/// Comma-separated override for [`Config::forge_hosts`].
pub const FORGE_HOSTS_ENV: &str = "PRBRIDGE_FORGE_HOSTS";
/// Override for [`Config::account`].
pub const ACCOUNT_ENV: &str = "PRBRIDGE_ACCOUNT";

/// Settings shared by the CLI and the live adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosts whose remotes count as forge repositories.
    pub forge_hosts: Vec<String>,
    /// Environment variable holding the forge access token.
    pub token_env: String,
    /// Account name attached to sessions.
    pub account: Option<String>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forge_hosts: vec![FORGE_HOST.to_string()],
            token_env: "PRBRIDGE_TOKEN".to_string(),
            account: None,
            log_filter: "prbridge=info,warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the file named by
    /// `PRBRIDGE_CONFIG`, or defaults when neither is given, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid YAML for this schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| Error::ConfigRead { path: path.clone(), source })?;
                Self::from_yaml(&content).map_err(|source| Error::ConfigParse { path, source })?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parses a YAML document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this schema.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hosts) = lookup(FORGE_HOSTS_ENV) {
            let hosts: Vec<String> = hosts
                .split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .map(str::to_ascii_lowercase)
                .collect();
            if !hosts.is_empty() {
                self.forge_hosts = hosts;
            }
        }
        if let Some(account) = lookup(ACCOUNT_ENV).filter(|account| !account.is_empty()) {
            self.account = Some(account);
        }
    }

    /// Returns `true` if `host` is one of the configured forge hosts.
    #[must_use]
    pub fn is_forge_host(&self, host: &str) -> bool {
        self.forge_hosts.iter().any(|known| known.eq_ignore_ascii_case(host))
    }
}
