//! Reads what the remote player is currently playing.

use log::trace;

use crate::errors::ControlError;
use crate::player::{NodeKind, PlayerControl, PlaylistNode};

/// Active item location and elapsed time observed in one poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NowPlaying {
    /// URI of the active item. Empty when nothing is flagged as current.
    pub location: String,
    pub position_seconds: u32,
    pub duration_seconds: u32,
}

/// Finds the current item among the children of the first top-level container.
///
/// Only that one level is inspected: items inside nested folders of the remote playlist
/// are not found.
pub fn current_location(root: &PlaylistNode) -> Option<&str> {
    let node = root
        .children
        .first()?
        .children
        .iter()
        .find(|node| node.kind == NodeKind::Leaf && node.is_current)?;
    trace!("Current playlist item. id={} name={}", node.id, node.name);
    Some(node.location.as_str())
}

/// Fetches the playlist tree and transport status and combines them.
pub fn read_currently_playing(player: &dyn PlayerControl) -> Result<NowPlaying, ControlError> {
    let tree = player.fetch_playlist_tree()?;
    let location = current_location(&tree).unwrap_or_default().to_string();
    let status = player.fetch_status()?;
    Ok(NowPlaying {
        location,
        position_seconds: status.elapsed_seconds,
        duration_seconds: status.total_duration_seconds,
    })
}
