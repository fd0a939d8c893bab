//! `login` and `logout`: drive the registry's credential operations.

use std::env;

use crate::context::ServiceContext;
use crate::state::RegistryState;

/// Run the `login` command.
///
/// # Errors
///
/// Returns an error string if the credential store fails.
pub fn login(ctx: &ServiceContext) -> Result<(), String> {
    let registry = ctx.registry(&[]);
    let authenticated = super::block_on(registry.authenticate())?.map_err(|e| e.to_string())?;
    if authenticated {
        println!("Authenticated");
    } else {
        println!("No session available; set {}", ctx.config.token_env);
    }
    Ok(())
}

/// Run the `logout` command.
///
/// Only the session cached by this process is dropped. When the token
/// variable is still set, the output says so, since the next run restores
/// the session from it.
///
/// # Errors
///
/// Returns an error string if the credential store fails.
pub fn logout(ctx: &ServiceContext) -> Result<(), String> {
    let registry = ctx.registry(&[]);
    super::block_on(registry.clear_credential_cache())?.map_err(|e| e.to_string())?;
    let token_still_set = env::var(&ctx.config.token_env).is_ok_and(|v| !v.trim().is_empty());
    println!("{}", logout_message(registry.state(), &ctx.config.token_env, token_still_set));
    Ok(())
}

fn logout_message(state: RegistryState, token_env: &str, token_still_set: bool) -> String {
    if token_still_set {
        format!(
            "Cached session dropped; state: {state}. {token_env} is still set, \
             so the next run signs in again; unset it to log out"
        )
    } else {
        format!("Credential cache cleared; state: {state}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logout_without_token_reports_cleared_cache() {
        assert_eq!(
            logout_message(RegistryState::Initializing, "PRBRIDGE_TOKEN", false),
            "Credential cache cleared; state: Initializing"
        );
    }

    #[test]
    fn logout_with_token_warns_that_it_is_still_set() {
        let message = logout_message(RegistryState::Initializing, "PRBRIDGE_TOKEN", true);
        assert!(message.starts_with("Cached session dropped; state: Initializing."));
        assert!(message.contains("PRBRIDGE_TOKEN is still set"));
        assert!(!message.contains("Credential cache cleared"));
    }
}
