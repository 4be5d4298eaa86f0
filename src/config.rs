//! Persisted resume state model and defaults.

/// Root record persisted to `vlc-resume.toml`.
///
/// `position` is only meaningful while `playing` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeState {
    /// Player executable launched at startup.
    #[serde(default = "default_player_path")]
    pub player_path: String,
    /// URI of the last item seen playing. Empty means nothing to resume.
    #[serde(default)]
    pub playing: String,
    /// Last observed elapsed time of `playing`, in seconds.
    #[serde(default)]
    pub position: u32,
    /// Skip-intro offset in seconds. 0 disables it.
    #[serde(default)]
    pub begin_skip: u32,
    /// Skip-outro threshold in seconds. 0 disables it.
    #[serde(default)]
    pub end_skip: u32,
    /// Player control channel endpoint.
    #[serde(default)]
    pub control: ControlEndpointConfig,
}

impl Default for ResumeState {
    fn default() -> Self {
        Self {
            player_path: default_player_path(),
            playing: String::new(),
            position: 0,
            begin_skip: 0,
            end_skip: 0,
            control: ControlEndpointConfig::default(),
        }
    }
}

impl ResumeState {
    /// Returns `true` when a previous session left something to resume.
    pub fn has_resume_item(&self) -> bool {
        !self.playing.is_empty()
    }

    /// Returns `true` when the observed item or position differs from the stored one.
    pub fn differs_from(&self, location: &str, position: u32) -> bool {
        self.playing != location || self.position != position
    }
}

/// Where the player's HTTP control interface listens.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ControlEndpointConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Fallback secret used when the OS keyring holds none.
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for ControlEndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: default_password(),
        }
    }
}

impl ControlEndpointConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host.trim(), self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_password() -> String {
    "password".to_string()
}

#[cfg(target_os = "windows")]
fn default_player_path() -> String {
    "C:/Program Files/VideoLAN/VLC/vlc.exe".to_string()
}

#[cfg(target_os = "macos")]
fn default_player_path() -> String {
    "/Applications/VLC.app/Contents/MacOS/VLC".to_string()
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_player_path() -> String {
    "vlc".to_string()
}
