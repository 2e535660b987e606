use std::fs;
use std::path::{Path, PathBuf};

use crate::io::atomic::atomic_write;
use crate::model::config::AppConfig;

const APP_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "taskboard.toml";

/// Error type for reading and writing the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory: set XDG_CONFIG_HOME or HOME, or pass --config")]
    NoConfigDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// `$XDG_CONFIG_HOME/taskboard`, falling back to `~/.config/taskboard`
pub fn config_dir() -> Option<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty());
    let base = match xdg {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(std::env::var_os("HOME").filter(|v| !v.is_empty())?).join(".config"),
    };
    Some(base.join(APP_DIR))
}

/// Path of the config file: `override_path` if given, else the default location
pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => config_dir()
            .map(|d| d.join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir),
    }
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits. A missing file
/// yields defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            String::new()
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let parse_err = |message: String| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    };
    let config: AppConfig = toml::from_str(&text).map_err(|e| parse_err(e.to_string()))?;
    let doc: toml_edit::DocumentMut = text
        .parse()
        .map_err(|e: toml_edit::TomlError| parse_err(e.to_string()))?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set `[session] user`
pub fn set_session_user(doc: &mut toml_edit::DocumentMut, user: &str) {
    if !doc.contains_key("session") {
        doc["session"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["session"]["user"] = toml_edit::value(user);
}

/// Remove `[session] user`. Returns whether a user was set.
pub fn clear_session_user(doc: &mut toml_edit::DocumentMut) -> bool {
    doc.get_mut("session")
        .and_then(|s| s.as_table_like_mut())
        .and_then(|t| t.remove("user"))
        .is_some()
}

/// Root for stored documents, UI state and the TUI log.
///
/// `--data-dir` wins over `[store] data_dir`; the default is `data/` next
/// to the config file. A relative configured path is taken relative to the
/// config file's directory.
pub fn resolve_data_dir(config: &AppConfig, config_path: &Path, override_dir: Option<&Path>) -> PathBuf {
    let base = config_path.parent().unwrap_or(Path::new("."));
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    match &config.store.data_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => base.join(dir),
        None => base.join("data"),
    }
}
