//! Persistence collaborators. Both backends speak the same [`Store`] contract
//! and refuse every call when nobody is signed in.

pub mod file;
pub mod memory;
pub mod sample;

use std::path::PathBuf;

use crate::model::{NewProject, NewTask, Project, ProjectId, Task, TaskId, TaskSummary};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The signed-in user, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn signed_in(user: impl Into<String>) -> Self {
        Session {
            user: Some(user.into()),
        }
    }

    pub fn anonymous() -> Self {
        Session { user: None }
    }

    /// Build from an optional configured user; blank names count as no session
    pub fn from_user(user: Option<&str>) -> Self {
        match user.map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => Session::signed_in(u),
            None => Session::anonymous(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// The user id, or `Unauthenticated`
    pub fn user(&self) -> Result<&str, StoreError> {
        self.user.as_deref().ok_or(StoreError::Unauthenticated)
    }
}

/// Create/read/update/delete of projects and tasks for the signed-in user
pub trait Store {
    fn session(&self) -> &Session;

    fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    fn create_project(&mut self, data: NewProject) -> Result<Project, StoreError>;
    fn update_project(&mut self, project: &Project) -> Result<(), StoreError>;

    fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskSummary>, StoreError>;
    /// `Ok(None)` when the task does not exist
    fn get_task(&self, project_id: &ProjectId, task_id: &TaskId) -> Result<Option<Task>, StoreError>;
    fn create_task(&mut self, project_id: &ProjectId, data: NewTask) -> Result<Task, StoreError>;
    fn update_task(&mut self, project_id: &ProjectId, task: &Task) -> Result<(), StoreError>;
    fn delete_task(&mut self, project_id: &ProjectId, task_id: &TaskId) -> Result<(), StoreError>;
}
