//! Recording player double for unit tests.

use std::cell::{Cell, RefCell};

use crate::errors::ControlError;
use crate::player::{PlaybackStatus, PlayerControl, PlaylistNode};

/// One remote call observed by `FakePlayer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    StartAndPlay(String),
    Seek(u32),
    Next,
    ToggleFullscreen,
    AddToPlaylist(String),
    FetchPlaylistTree,
    FetchStatus,
}

#[derive(Default)]
pub struct FakePlayer {
    pub calls: RefCell<Vec<PlayerCall>>,
    pub tree: RefCell<Option<PlaylistNode>>,
    pub status: Cell<PlaybackStatus>,
    /// Number of upcoming `start_and_play` calls to reject.
    pub reject_starts: Cell<usize>,
    /// Reject every `start_and_play` call.
    pub reject_all_starts: Cell<bool>,
    /// Fail `add_to_playlist` once this many items were added.
    pub fail_add_after: Cell<Option<usize>>,
    pub unreachable: Cell<bool>,
    pub fail_seek: Cell<bool>,
}

impl FakePlayer {
    pub fn with_tree(tree: PlaylistNode, elapsed_seconds: u32) -> Self {
        let player = Self::default();
        *player.tree.borrow_mut() = Some(tree);
        player.status.set(PlaybackStatus {
            elapsed_seconds,
            total_duration_seconds: 1_500,
        });
        player
    }

    /// Playlist tree with a single current leaf at `location`.
    pub fn playing(location: &str, elapsed_seconds: u32) -> Self {
        let tree = PlaylistNode::container(
            "",
            "0",
            vec![
                PlaylistNode::container(
                    "Playlist",
                    "1",
                    vec![PlaylistNode::leaf("current", "15", location, true)],
                ),
                PlaylistNode::container("Media Library", "2", Vec::new()),
            ],
        );
        Self::with_tree(tree, elapsed_seconds)
    }

    pub fn set_playing(&self, location: &str, elapsed_seconds: u32) {
        let next = Self::playing(location, elapsed_seconds);
        *self.tree.borrow_mut() = next.tree.take();
        self.status.set(next.status.get());
    }

    pub fn recorded(&self) -> Vec<PlayerCall> {
        self.calls.borrow().clone()
    }

    /// Recorded calls other than the two read-only fetches.
    pub fn mutations(&self) -> Vec<PlayerCall> {
        self.recorded()
            .into_iter()
            .filter(|call| {
                !matches!(
                    call,
                    PlayerCall::FetchPlaylistTree | PlayerCall::FetchStatus
                )
            })
            .collect()
    }

    pub fn added(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter_map(|call| match call {
                PlayerCall::AddToPlaylist(uri) => Some(uri),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlayerCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check_reachable(&self, operation: &str) -> Result<(), ControlError> {
        if self.unreachable.get() {
            return Err(ControlError::unreachable(operation, "connection refused"));
        }
        Ok(())
    }
}

impl PlayerControl for FakePlayer {
    fn start_and_play(&self, uri: &str) -> Result<(), ControlError> {
        self.check_reachable("start and play")?;
        if self.reject_all_starts.get() {
            return Err(ControlError::rejected("start and play", "HTTP 503"));
        }
        if self.reject_starts.get() > 0 {
            self.reject_starts.set(self.reject_starts.get() - 1);
            return Err(ControlError::unreachable("start and play", "connection refused"));
        }
        self.record(PlayerCall::StartAndPlay(uri.to_string()));
        Ok(())
    }

    fn seek(&self, seconds: u32) -> Result<(), ControlError> {
        self.check_reachable("seek")?;
        if self.fail_seek.get() {
            return Err(ControlError::rejected("seek", "HTTP 500"));
        }
        self.record(PlayerCall::Seek(seconds));
        Ok(())
    }

    fn next(&self) -> Result<(), ControlError> {
        self.check_reachable("next")?;
        self.record(PlayerCall::Next);
        Ok(())
    }

    fn toggle_fullscreen(&self) -> Result<(), ControlError> {
        self.check_reachable("toggle fullscreen")?;
        self.record(PlayerCall::ToggleFullscreen);
        Ok(())
    }

    fn add_to_playlist(&self, uri: &str) -> Result<(), ControlError> {
        self.check_reachable("add to playlist")?;
        if let Some(limit) = self.fail_add_after.get() {
            if self.added().len() >= limit {
                return Err(ControlError::rejected("add to playlist", "HTTP 404"));
            }
        }
        self.record(PlayerCall::AddToPlaylist(uri.to_string()));
        Ok(())
    }

    fn fetch_playlist_tree(&self) -> Result<PlaylistNode, ControlError> {
        self.check_reachable("fetch playlist")?;
        self.record(PlayerCall::FetchPlaylistTree);
        self.tree
            .borrow()
            .clone()
            .ok_or_else(|| ControlError::unreachable("fetch playlist", "empty response"))
    }

    fn fetch_status(&self) -> Result<PlaybackStatus, ControlError> {
        self.check_reachable("fetch status")?;
        self.record(PlayerCall::FetchStatus);
        Ok(self.status.get())
    }
}
