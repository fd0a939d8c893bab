//! `tracing` subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to the
/// configured filter. `verbose` forces debug output for this crate.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &Config, verbose: bool) -> bool {
    let filter = if verbose {
        EnvFilter::new("prbridge=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok()
}
