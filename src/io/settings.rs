use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::io::config_io::{self, ConfigError};
use crate::model::config::{AppConfig, Backend};
use crate::ops::classify::ClosedTasks;
use crate::store::{FileStore, MemoryStore, Session, Store};

/// Config file contents plus command-line overrides, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub backend: Backend,
}

impl Settings {
    pub fn load(
        config_override: Option<&Path>,
        backend_override: Option<Backend>,
        data_dir_override: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config_path = config_io::config_path(config_override)?;
        let (config, _) = config_io::read_config(&config_path)?;
        let data_dir = config_io::resolve_data_dir(&config, &config_path, data_dir_override);
        let backend = backend_override.unwrap_or(config.store.backend);
        Ok(Settings {
            config,
            config_path,
            data_dir,
            backend,
        })
    }

    pub fn session(&self) -> Session {
        Session::from_user(self.config.session.user.as_deref())
    }

    /// The configured backend. The memory store starts from the demo data
    /// laid out around `today`.
    pub fn open_store(&self, today: NaiveDate) -> Box<dyn Store> {
        tracing::debug!(backend = ?self.backend, data_dir = %self.data_dir.display(), "opening store");
        match self.backend {
            Backend::Memory => Box::new(MemoryStore::with_sample_data(self.session(), today)),
            Backend::File => Box::new(FileStore::new(&self.data_dir, self.session())),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.config
            .log
            .file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("taskboard.log"))
    }

    /// Closed-task policy for the board; `include` forces closed tasks in
    pub fn closed_tasks(&self, include: bool) -> ClosedTasks {
        if include || self.config.board.include_closed {
            ClosedTasks::Include
        } else {
            ClosedTasks::Exclude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn overrides_win_over_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("taskboard.toml");
        fs::write(
            &path,
            "[store]\nbackend = \"file\"\n\n[session]\nuser = \"ana\"\n\n[board]\ninclude_closed = true\n",
        )
        .unwrap();

        let s = Settings::load(Some(&path), None, None).unwrap();
        assert_eq!(s.backend, Backend::File);
        assert_eq!(s.data_dir, tmp.path().join("data"));
        assert_eq!(s.log_file(), tmp.path().join("data/taskboard.log"));
        assert!(s.session().is_signed_in());
        assert_eq!(s.closed_tasks(false), ClosedTasks::Include);

        let other = tmp.path().join("elsewhere");
        let s = Settings::load(Some(&path), Some(Backend::Memory), Some(&other)).unwrap();
        assert_eq!(s.backend, Backend::Memory);
        assert_eq!(s.data_dir, other);
    }

    #[test]
    fn memory_store_has_demo_projects() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("taskboard.toml");
        fs::write(&path, "[session]\nuser = \"ana\"\n").unwrap();
        let s = Settings::load(Some(&path), None, None).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(s.open_store(today).list_projects().unwrap().len(), 3);
        assert_eq!(s.closed_tasks(false), ClosedTasks::Exclude);
        assert_eq!(s.closed_tasks(true), ClosedTasks::Include);
    }
}
