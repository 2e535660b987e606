use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::atomic::atomic_write;

const STATE_FILE: &str = ".state.json";

/// Persisted TUI state (written to .state.json in the data directory)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Query string of the last location, without the leading `?`
    #[serde(default)]
    pub location: String,
    /// Last user that had the board open, so a different sign-in starts fresh
    #[serde(default)]
    pub user: Option<String>,
}

/// Read .state.json. Missing or unreadable state is `None`.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed UI state");
            None
        }
    }
}

/// Write .state.json
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&data_dir.join(STATE_FILE), content.as_bytes())
}
