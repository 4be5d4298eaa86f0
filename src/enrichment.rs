//! Appends the rest of the current item's folder to the remote playlist.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::errors::ControlError;
use crate::media_file_discovery::{collect_sibling_files, location_to_path, path_to_location};
use crate::player::PlayerControl;

/// Last directory whose siblings were appended. Owned by the reconciliation loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentMemo {
    last_directory: Option<PathBuf>,
}

impl EnrichmentMemo {
    #[cfg(test)]
    pub fn last_directory(&self) -> Option<&Path> {
        self.last_directory.as_deref()
    }

    fn covers(&self, directory: &Path) -> bool {
        self.last_directory.as_deref() == Some(directory)
    }

    fn remember(&mut self, directory: &Path) {
        self.last_directory = Some(directory.to_path_buf());
        debug!("Enrichment memo set. directory={}", directory.display());
    }
}

/// Result of a single enrichment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Location is empty or not a local file.
    NotLocal,
    /// Directory already enriched; nothing was listed or appended.
    AlreadyEnriched,
    /// Directory listed; this many successors were appended.
    Appended(usize),
}

/// Appends the files after `current_location` in its directory, at most once per directory.
///
/// On an append failure the items already appended stay queued and the directory is still
/// memoized, so the next poll does not queue them twice. A listing failure leaves the memo
/// untouched.
pub fn enrich(
    player: &dyn PlayerControl,
    current_location: &str,
    memo: &mut EnrichmentMemo,
) -> Result<EnrichmentOutcome, ControlError> {
    let Some(current) = location_to_path(current_location) else {
        return Ok(EnrichmentOutcome::NotLocal);
    };
    let Some(directory) = current.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(EnrichmentOutcome::NotLocal);
    };
    if memo.covers(directory) {
        return Ok(EnrichmentOutcome::AlreadyEnriched);
    }

    let extension = current.extension();
    debug!(
        "Enriching playlist. current={}, directory={}, extension={:?}",
        current.display(),
        directory.display(),
        extension
    );
    let siblings = collect_sibling_files(directory, extension).map_err(|err| {
        ControlError::DirectoryUnreadable {
            path: directory.to_path_buf(),
            reason: err.to_string(),
        }
    })?;

    let successors = siblings
        .iter()
        .skip_while(|path| path.file_name() != current.file_name())
        .skip(1);

    let mut appended = 0;
    for path in successors {
        let item = path_to_location(path);
        if let Err(err) = player.add_to_playlist(&item) {
            memo.remember(directory);
            return Err(ControlError::PlaylistMutationFailed {
                item,
                reason: err.to_string(),
            });
        }
        info!("Appended to playlist. item={}", path.display());
        appended += 1;
    }

    memo.remember(directory);
    Ok(EnrichmentOutcome::Appended(appended))
}
