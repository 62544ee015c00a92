//! # Local State Store
//!
//! Small JSON file remembering per-user dashboard preferences between runs,
//! currently the last selected channel for each user. The file is loaded once
//! at startup and rewritten on every change; losing it only costs the
//! remembered selection.

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default state file location
pub(crate) const DEFAULT_STATE_FILE: &str = "./dashboard-state.json";

/// Everything persisted between dashboard runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedState {
    /// user id → last selected channel id
    #[serde(default)]
    pub selected_channels: HashMap<i64, i64>,
}

/// File-backed store for [`PersistedState`].
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_STATE_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(&self) -> PersistedState {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => {
                    tracing::info!("Loaded dashboard state from {:?}", self.path);
                    state
                }
                Err(e) => {
                    tracing::warn!(
                        "State file {:?} is not valid JSON: {}. Using defaults.",
                        self.path,
                        e
                    );
                    PersistedState::default()
                }
            },
            Err(e) => {
                tracing::debug!("No dashboard state at {:?}: {}. Using defaults.", self.path, e);
                PersistedState::default()
            }
        }
    }

    /// Write the full persisted state to disk.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, contents)?;
        tracing::debug!("Saved dashboard state to {:?}", self.path);
        Ok(())
    }

    /// Remember the selected channel for a user.
    pub fn remember_selection(&self, user_id: i64, channel_id: i64) -> Result<()> {
        let mut state = self.load();
        state.selected_channels.insert(user_id, channel_id);
        self.save(&state)
    }

    /// Drop the remembered channel for a user (e.g. after it was deleted).
    pub fn forget_selection(&self, user_id: i64) -> Result<()> {
        let mut state = self.load();
        if state.selected_channels.remove(&user_id).is_some() {
            self.save(&state)?;
        }
        Ok(())
    }

    /// Remembered channel for a user, if any.
    pub fn restore_selection(&self, user_id: i64) -> Option<i64> {
        self.load().selected_channels.get(&user_id).copied()
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalStore {
        let path = std::env::temp_dir().join(format!("dashboard-state-{}.json", uuid::Uuid::new_v4()));
        LocalStore::with_path(path)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = temp_store();
        assert_eq!(store.load(), PersistedState::default());
        assert_eq!(store.restore_selection(1), None);
    }

    #[test]
    fn test_selection_roundtrip() {
        let store = temp_store();

        store.remember_selection(42, 7).unwrap();
        store.remember_selection(43, 9).unwrap();
        assert_eq!(store.restore_selection(42), Some(7));
        assert_eq!(store.restore_selection(43), Some(9));

        // A fresh store over the same file sees the same data
        let reopened = LocalStore::with_path(store.path().to_path_buf());
        assert_eq!(reopened.restore_selection(42), Some(7));

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_forget_selection() {
        let store = temp_store();

        store.remember_selection(1, 5).unwrap();
        store.forget_selection(1).unwrap();
        assert_eq!(store.restore_selection(1), None);

        // Forgetting an unknown user is a no-op
        store.forget_selection(999).unwrap();

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let store = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load(), PersistedState::default());

        std::fs::remove_file(store.path()).ok();
    }
}
