//! Starts the player with its HTTP control interface enabled.

use std::process::{Child, Command, Stdio};

use log::info;

use crate::config::ControlEndpointConfig;

/// Command-line arguments that enable the HTTP interface alongside the regular GUI.
pub fn launch_args(endpoint: &ControlEndpointConfig, password: &str) -> Vec<String> {
    vec![
        "--intf".to_string(),
        "http".to_string(),
        "--extraintf".to_string(),
        "qt".to_string(),
        "--http-host".to_string(),
        endpoint.host.trim().to_string(),
        "--http-port".to_string(),
        endpoint.port.to_string(),
        "--http-password".to_string(),
        password.to_string(),
    ]
}

/// Spawns the player detached. The child keeps running after this process exits.
pub fn launch(
    player_path: &str,
    endpoint: &ControlEndpointConfig,
    password: &str,
) -> std::io::Result<Child> {
    let child = Command::new(player_path)
        .args(launch_args(endpoint, password))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    info!(
        "Started player. path={} pid={} endpoint={}",
        player_path,
        child.id(),
        endpoint.base_url()
    );
    Ok(child)
}
