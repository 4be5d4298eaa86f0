//! Skip-intro / skip-outro decision.

use crate::errors::ControlError;
use crate::player::PlayerControl;

/// Remote action chosen for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipAction {
    None,
    /// Seek the current item to the begin offset.
    SeekTo(u32),
    /// Advance to the next playlist item, then seek it to the begin offset.
    AdvanceAndSeekTo(u32),
}

/// Maps a position and the two thresholds to an action. A threshold of 0 disables its branch.
pub fn decide(position: u32, begin_skip: u32, end_skip: u32) -> SkipAction {
    if begin_skip != 0 && position < begin_skip {
        SkipAction::SeekTo(begin_skip)
    } else if end_skip != 0 && position > end_skip {
        SkipAction::AdvanceAndSeekTo(begin_skip)
    } else {
        SkipAction::None
    }
}

/// Issues the remote calls for `action`. Stops at the first failing call.
pub fn apply(player: &dyn PlayerControl, action: SkipAction) -> Result<(), ControlError> {
    match action {
        SkipAction::None => Ok(()),
        SkipAction::SeekTo(seconds) => player.seek(seconds),
        SkipAction::AdvanceAndSeekTo(seconds) => {
            player.next()?;
            player.seek(seconds)
        }
    }
}
