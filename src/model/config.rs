use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from taskboard.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Which persistence backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Sample data held in memory, lost on exit
    #[default]
    Memory,
    /// JSON documents under the data directory
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Root of the document store and UI state. Default: `<config dir>/data`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Signed-in user. Absent means no session.
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Show completed and cancelled tasks on the board
    #[serde(default)]
    pub include_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Key hints in the status row when there is no notice to show
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme overrides, `name = "#RRGGBB"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// TUI log file. Default: `<data dir>/taskboard.log`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.backend, Backend::Memory);
        assert!(config.store.data_dir.is_none());
        assert!(config.session.user.is_none());
        assert!(!config.board.include_closed);
        assert_eq!(config.log.level, "warn");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn parses_all_sections() {
        let config: AppConfig = toml::from_str(
            r##"
[store]
backend = "file"
data_dir = "/tmp/tb"

[session]
user = "ana"

[board]
include_closed = true

[ui]
colors = { highlight = "#FF0000" }

[log]
level = "debug"
"##,
        )
        .unwrap();
        assert_eq!(config.store.backend, Backend::File);
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/tmp/tb")));
        assert_eq!(config.session.user.as_deref(), Some("ana"));
        assert!(config.board.include_closed);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
        assert_eq!(config.log.level, "debug");
    }
}
