//! Durable storage for the resume state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ResumeState;
use crate::errors::ControlError;

/// Backing store for `ResumeState`. Loaded once at startup, saved on every detected change.
pub trait ResumeStateStore {
    /// Reads the stored state. `Ok(None)` means nothing has been stored yet.
    fn read(&self) -> Result<Option<ResumeState>, ControlError>;
    fn save(&self, state: &ResumeState) -> Result<(), ControlError>;

    /// Reads the stored state, creating and persisting the default one on first use.
    fn load(&self) -> Result<ResumeState, ControlError> {
        if let Some(state) = self.read()? {
            return Ok(state);
        }
        let state = ResumeState::default();
        info!("Resume state not found. Creating default state.");
        if let Err(err) = self.save(&state) {
            warn!("{}", err);
        }
        Ok(state)
    }
}

/// TOML file store. Saves go through a sibling temp file and a rename.
pub struct TomlStateStore {
    path: PathBuf,
}

impl TomlStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }

    fn persist_failure(&self, reason: impl ToString) -> ControlError {
        ControlError::PersistFailure {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl ResumeStateStore for TomlStateStore {
    fn read(&self) -> Result<Option<ResumeState>, ControlError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No resume state at {}", self.path.display());
                return Ok(None);
            }
            Err(err) => {
                return Err(ControlError::ConfigUnreadable {
                    path: self.path.clone(),
                    reason: err.to_string(),
                })
            }
        };

        toml::from_str::<ResumeState>(&content)
            .map(Some)
            .map_err(|err| ControlError::ConfigUnreadable {
                path: self.path.clone(),
                reason: err.to_string(),
            })
    }

    fn save(&self, state: &ResumeState) -> Result<(), ControlError> {
        let text = toml::to_string(state).map_err(|err| self.persist_failure(err))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| self.persist_failure(err))?;
            }
        }

        let temp_path = self.temp_path();
        std::fs::write(&temp_path, text).map_err(|err| self.persist_failure(err))?;
        std::fs::rename(&temp_path, &self.path).map_err(|err| {
            let _ = std::fs::remove_file(&temp_path);
            self.persist_failure(err)
        })
    }
}
