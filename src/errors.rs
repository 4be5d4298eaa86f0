//! Failure taxonomy shared by the store, the player channel and the reconciliation loop.

use std::path::PathBuf;

/// Every failure the controller can observe.
///
/// Only `ConfigUnreadable` is fatal; everything else is logged and recovered on the next
/// poll tick (or by the bounded startup retry).
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("resume state at {} is unreadable: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },
    #[error("failed to persist resume state to {}: {reason}", path.display())]
    PersistFailure { path: PathBuf, reason: String },
    #[error("player unreachable during {operation}: {reason}")]
    PlayerUnreachable { operation: String, reason: String },
    #[error("player rejected {operation}: {reason}")]
    PlayerRejected { operation: String, reason: String },
    #[error("failed to append {item} to the playlist: {reason}")]
    PlaylistMutationFailed { item: String, reason: String },
    #[error("failed to list directory {}: {reason}", path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },
}

impl ControlError {
    /// Returns `true` for player-side failures that the next attempt may not hit.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ControlError::PlayerUnreachable { .. } | ControlError::PlayerRejected { .. }
        )
    }

    pub(crate) fn unreachable(operation: &str, reason: impl ToString) -> Self {
        ControlError::PlayerUnreachable {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn rejected(operation: &str, reason: impl ToString) -> Self {
        ControlError::PlayerRejected {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}
