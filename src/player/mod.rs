//! Player control channel abstractions and concrete implementations.

#[cfg(test)]
pub mod fake;
pub mod vlc_http;

use crate::errors::ControlError;

/// Node kind reported in the remote playlist tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Container,
}

/// Snapshot of one node of the remote playlist tree. Fetched fresh on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistNode {
    pub kind: NodeKind,
    pub name: String,
    pub id: String,
    /// Media URI. Empty for containers.
    pub location: String,
    pub is_current: bool,
    pub children: Vec<PlaylistNode>,
}

#[cfg(test)]
impl PlaylistNode {
    pub fn container(name: &str, id: &str, children: Vec<PlaylistNode>) -> Self {
        Self {
            kind: NodeKind::Container,
            name: name.to_string(),
            id: id.to_string(),
            location: String::new(),
            is_current: false,
            children,
        }
    }

    pub fn leaf(name: &str, id: &str, location: &str, is_current: bool) -> Self {
        Self {
            kind: NodeKind::Leaf,
            name: name.to_string(),
            id: id.to_string(),
            location: location.to_string(),
            is_current,
            children: Vec::new(),
        }
    }
}

/// Transport status snapshot, one per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub elapsed_seconds: u32,
    pub total_duration_seconds: u32,
}

/// Blocking request/response capabilities of a remotely controlled player.
pub trait PlayerControl {
    /// Enqueues `uri` and starts playing it.
    fn start_and_play(&self, uri: &str) -> Result<(), ControlError>;
    fn seek(&self, seconds: u32) -> Result<(), ControlError>;
    fn next(&self) -> Result<(), ControlError>;
    fn toggle_fullscreen(&self) -> Result<(), ControlError>;
    /// Appends `uri` to the end of the playlist without changing playback.
    fn add_to_playlist(&self, uri: &str) -> Result<(), ControlError>;
    fn fetch_playlist_tree(&self) -> Result<PlaylistNode, ControlError>;
    fn fetch_status(&self) -> Result<PlaybackStatus, ControlError>;
}
