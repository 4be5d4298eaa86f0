//! Control-channel secret lookup.

use keyring::Entry;
use log::{debug, warn};

use crate::config::ControlEndpointConfig;

const CONTROL_SERVICE_NAME: &str = "vlc-resume.control";

fn control_entry(endpoint: &ControlEndpointConfig) -> Result<Entry, String> {
    let account = format!("{}:{}", endpoint.host.trim(), endpoint.port);
    Entry::new(CONTROL_SERVICE_NAME, &account)
        .map_err(|err| format!("failed to create keyring entry: {err}"))
}

/// Loads the control password for an endpoint from the OS keyring.
pub fn get_control_password(endpoint: &ControlEndpointConfig) -> Result<Option<String>, String> {
    let entry = control_entry(endpoint)?;
    match entry.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(format!("failed to get keyring password: {err}")),
    }
}

/// Picks the keyring secret when one exists, otherwise the configured password.
pub fn resolve_control_password(endpoint: &ControlEndpointConfig) -> String {
    choose_password(get_control_password(endpoint), &endpoint.password)
}

fn choose_password(keyring_lookup: Result<Option<String>, String>, configured: &str) -> String {
    match keyring_lookup {
        Ok(Some(password)) if !password.is_empty() => {
            debug!("Using control password from keyring");
            password
        }
        Ok(_) => configured.to_string(),
        Err(err) => {
            warn!("{}. Falling back to configured control password.", err);
            configured.to_string()
        }
    }
}
