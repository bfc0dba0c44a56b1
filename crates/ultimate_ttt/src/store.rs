//! JSON file storage for settings and scores.

use derive_more::{Display, Error};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use ultimate_ttt_core::SavedState;

/// Storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Serialization error: {}", err))
    }
}

/// Saved-state file at a fixed path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates a store backed by `path`. Nothing is touched until the first
    /// load or save.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        debug!("Creating Store");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved state. `None` when nothing has been saved yet.
    ///
    /// A file that exists but cannot be parsed still loads, with each
    /// unreadable field at its default.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<SavedState>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved state");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let state = SavedState::from_json(&raw);
        info!(mode = %state.mode, best_of = %state.best_of, "Saved state loaded");
        Ok(Some(state))
    }

    /// Writes `state`, replacing any previous save.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    #[instrument(skip(self, state), fields(path = %self.path.display()))]
    pub fn save(&self, state: &SavedState) -> Result<(), StoreError> {
        let raw = state.to_json()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, raw)?;
        std::fs::rename(&staging, &self.path)?;
        debug!("Saved state written");
        Ok(())
    }

    /// Saves `state`, logging instead of failing.
    #[instrument(skip(self, state))]
    pub fn save_best_effort(&self, state: &SavedState) {
        if let Err(e) = self.save(state) {
            warn!(error = %e, "Failed to save state");
        }
    }
}
