use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::io::atomic::atomic_write;
use crate::model::{NewProject, NewTask, Project, ProjectId, Task, TaskId, TaskSummary};

use super::{Session, Store, StoreError};

/// Document store on disk, one JSON document per project and per task:
///
/// ```text
/// <root>/users/<user>/projects/<project>.json
/// <root>/users/<user>/projects/<project>/tasks/<task>.json
/// ```
///
/// Identifiers are the file stems. Documents hold everything but the id.
pub struct FileStore {
    root: PathBuf,
    session: Session,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, session: Session) -> Self {
        FileStore {
            root: root.into(),
            session,
        }
    }

    /// A user name that cannot name a directory counts as no session
    fn projects_dir(&self) -> Result<PathBuf, StoreError> {
        let user = self.session.user()?;
        if !is_path_segment(user) {
            tracing::warn!(user, "user name is not usable as a directory");
            return Err(StoreError::Unauthenticated);
        }
        Ok(self.root.join("users").join(user).join("projects"))
    }

    fn project_path(&self, project_id: &ProjectId) -> Result<PathBuf, StoreError> {
        let dir = self.projects_dir()?;
        if !is_path_segment(project_id.as_str()) {
            return Err(StoreError::ProjectNotFound(project_id.clone()));
        }
        Ok(dir.join(format!("{}.json", project_id)))
    }

    fn tasks_dir(&self, project_id: &ProjectId) -> Result<PathBuf, StoreError> {
        let dir = self.projects_dir()?;
        if !is_path_segment(project_id.as_str()) {
            return Err(StoreError::ProjectNotFound(project_id.clone()));
        }
        Ok(dir.join(project_id.as_str()).join("tasks"))
    }

    fn task_path(&self, project_id: &ProjectId, task_id: &TaskId) -> Result<PathBuf, StoreError> {
        let dir = self.tasks_dir(project_id)?;
        if !is_path_segment(task_id.as_str()) {
            return Err(StoreError::TaskNotFound(task_id.clone()));
        }
        Ok(dir.join(format!("{}.json", task_id)))
    }

    fn require_project(&self, project_id: &ProjectId) -> Result<(), StoreError> {
        if self.project_path(project_id)?.is_file() {
            Ok(())
        } else {
            Err(StoreError::ProjectNotFound(project_id.clone()))
        }
    }
}

/// Ids and user names become file and directory names. Anything that could
/// leave its directory names no document.
fn is_path_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && !s.contains("..")
        && !s.contains(['/', '\\', '\0'])
}

/// Time-ordered so that listing by id lists in creation order
fn new_document_id() -> String {
    Uuid::now_v7().simple().to_string()
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })?;
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// `(id, path)` of every `*.json` document directly in `dir`, sorted by id.
/// A missing directory is an empty collection.
fn list_documents(dir: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let read_err = |e| StoreError::Read {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            docs.push((stem.to_string(), path.clone()));
        }
    }
    docs.sort();
    Ok(docs)
}

impl Store for FileStore {
    fn session(&self) -> &Session {
        &self.session
    }

    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let dir = self.projects_dir()?;
        list_documents(&dir)?
            .into_iter()
            .map(|(id, path)| Ok(Project::new(ProjectId(id), read_document(&path)?)))
            .collect()
    }

    fn create_project(&mut self, data: NewProject) -> Result<Project, StoreError> {
        let project = Project::new(ProjectId(new_document_id()), data);
        write_document(&self.project_path(&project.id)?, &project.without_tasks().fields)?;
        tracing::info!(project = %project.id, name = %project.name, "created project");
        Ok(project)
    }

    fn update_project(&mut self, project: &Project) -> Result<(), StoreError> {
        self.require_project(&project.id)?;
        write_document(&self.project_path(&project.id)?, &project.without_tasks().fields)?;
        tracing::debug!(project = %project.id, "updated project");
        Ok(())
    }

    fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskSummary>, StoreError> {
        let dir = match self.tasks_dir(project_id) {
            Ok(dir) => dir,
            Err(StoreError::ProjectNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        list_documents(&dir)?
            .into_iter()
            .map(|(id, path)| {
                let fields: NewTask = read_document(&path)?;
                Ok(Task::new(TaskId(id), fields).summary())
            })
            .collect()
    }

    fn get_task(&self, project_id: &ProjectId, task_id: &TaskId) -> Result<Option<Task>, StoreError> {
        let path = match self.task_path(project_id, task_id) {
            Ok(path) => path,
            Err(StoreError::ProjectNotFound(_) | StoreError::TaskNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !path.is_file() {
            tracing::debug!(project = %project_id, task = %task_id, "task document missing");
            return Ok(None);
        }
        let fields: NewTask = read_document(&path)?;
        Ok(Some(Task::new(task_id.clone(), fields)))
    }

    fn create_task(&mut self, project_id: &ProjectId, data: NewTask) -> Result<Task, StoreError> {
        self.require_project(project_id)?;
        let task = Task::new(TaskId(new_document_id()), data);
        write_document(&self.task_path(project_id, &task.id)?, &task.fields)?;
        tracing::info!(project = %project_id, task = %task.id, "created task");
        Ok(task)
    }

    fn update_task(&mut self, project_id: &ProjectId, task: &Task) -> Result<(), StoreError> {
        let path = self.task_path(project_id, &task.id)?;
        if !path.is_file() {
            return Err(StoreError::TaskNotFound(task.id.clone()));
        }
        write_document(&path, &task.fields)?;
        tracing::debug!(project = %project_id, task = %task.id, "updated task");
        Ok(())
    }

    fn delete_task(&mut self, project_id: &ProjectId, task_id: &TaskId) -> Result<(), StoreError> {
        let path = self.task_path(project_id, task_id)?;
        if !path.is_file() {
            return Err(StoreError::TaskNotFound(task_id.clone()));
        }
        fs::remove_file(&path).map_err(|e| StoreError::Write { path, source: e })?;
        tracing::info!(project = %project_id, task = %task_id, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Subtask, TaskStatus};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path(), Session::signed_in("ana"))
    }

    fn new_project(name: &str) -> NewProject {
        NewProject {
            name: name.into(),
            description: "d".into(),
            categories: vec![Category::new("Planning")],
        }
    }

    #[test]
    fn every_call_requires_a_session() {
        let dir = TempDir::new().unwrap();
        let mut s = FileStore::new(dir.path(), Session::anonymous());
        let pid = ProjectId::from("p");
        let tid = TaskId::from("t");
        assert!(matches!(s.list_projects(), Err(StoreError::Unauthenticated)));
        assert!(matches!(s.create_project(new_project("x")), Err(StoreError::Unauthenticated)));
        assert!(matches!(s.list_tasks(&pid), Err(StoreError::Unauthenticated)));
        assert!(matches!(s.get_task(&pid, &tid), Err(StoreError::Unauthenticated)));
        assert!(matches!(s.delete_task(&pid, &tid), Err(StoreError::Unauthenticated)));
        assert!(!dir.path().join("users").exists());
    }

    #[test]
    fn projects_persist_in_creation_order() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let a = s.create_project(new_project("Alpha")).unwrap();
        let b = s.create_project(new_project("Beta")).unwrap();

        let listed = store(&dir).list_projects().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], a);
        assert_eq!(listed[1].name, "Beta");
        assert_eq!(listed[1].id, b.id);
        assert!(
            dir.path()
                .join("users/ana/projects")
                .join(format!("{}.json", a.id))
                .is_file()
        );
    }

    #[test]
    fn users_do_not_see_each_other() {
        let dir = TempDir::new().unwrap();
        store(&dir).create_project(new_project("Mine")).unwrap();
        let other = FileStore::new(dir.path(), Session::signed_in("luis"));
        assert!(other.list_projects().unwrap().is_empty());
    }

    #[test]
    fn update_project_requires_existing_document() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let mut p = s.create_project(new_project("Alpha")).unwrap();
        p.categories.push(Category::new("Review"));
        s.update_project(&p).unwrap();
        assert_eq!(s.list_projects().unwrap()[0].categories.len(), 2);

        let ghost = Project::new(ProjectId::from("ghost"), new_project("Ghost"));
        assert!(matches!(
            s.update_project(&ghost),
            Err(StoreError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn task_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let p = s.create_project(new_project("Alpha")).unwrap();
        let mut t = s
            .create_task(
                &p.id,
                NewTask {
                    title: "Draft".into(),
                    due_date: "2025-04-11".into(),
                    category: "Planning".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        let summaries = s.list_tasks(&p.id).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "Draft");
        assert_eq!(summaries[0].category, "Planning");

        t.subtasks.push(Subtask::new("outline", ""));
        t.status = TaskStatus::InProgress;
        s.update_task(&p.id, &t).unwrap();
        let loaded = s.get_task(&p.id, &t.id).unwrap().unwrap();
        assert_eq!(loaded, t);

        s.delete_task(&p.id, &t.id).unwrap();
        assert!(s.get_task(&p.id, &t.id).unwrap().is_none());
        assert!(s.list_tasks(&p.id).unwrap().is_empty());
        assert!(matches!(
            s.delete_task(&p.id, &t.id),
            Err(StoreError::TaskNotFound(_))
        ));
        assert!(matches!(
            s.update_task(&p.id, &t),
            Err(StoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn ids_cannot_reach_other_documents() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let a = s.create_project(new_project("Alpha")).unwrap();
        let b = s.create_project(new_project("Beta")).unwrap();
        let t = s
            .create_task(
                &a.id,
                NewTask {
                    title: "Draft".into(),
                    category: "Planning".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        let escape = TaskId(format!("../../{}", b.id));
        assert!(s.get_task(&a.id, &escape).unwrap().is_none());
        let mut forged = t.clone();
        forged.id = escape.clone();
        assert!(matches!(
            s.update_task(&a.id, &forged),
            Err(StoreError::TaskNotFound(_))
        ));
        assert!(matches!(
            s.delete_task(&a.id, &escape),
            Err(StoreError::TaskNotFound(_))
        ));

        for bad in ["", ".", "..", "a/b", "a\\b", "x\0y"] {
            let pid = ProjectId::from(bad);
            assert!(s.get_task(&pid, &t.id).unwrap().is_none(), "{:?}", bad);
            assert!(s.list_tasks(&pid).unwrap().is_empty(), "{:?}", bad);
            assert!(
                matches!(
                    s.create_task(&pid, NewTask::default()),
                    Err(StoreError::ProjectNotFound(_))
                ),
                "{:?}",
                bad
            );
            let mut renamed = b.clone();
            renamed.id = pid;
            assert!(matches!(
                s.update_project(&renamed),
                Err(StoreError::ProjectNotFound(_))
            ));
        }

        // Beta is untouched
        let listed = s.list_projects().unwrap();
        assert_eq!(listed[1], b);
        assert_eq!(s.list_tasks(&a.id).unwrap().len(), 1);
    }

    #[test]
    fn unusable_user_name_is_no_session() {
        let dir = TempDir::new().unwrap();
        for user in ["../ana", "a/b", ".."] {
            let mut s = FileStore::new(dir.path().join("data"), Session::signed_in(user));
            assert!(matches!(s.list_projects(), Err(StoreError::Unauthenticated)));
            assert!(matches!(
                s.create_project(new_project("x")),
                Err(StoreError::Unauthenticated)
            ));
        }
        assert!(!dir.path().join("ana").exists());
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn create_task_needs_project() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let err = s
            .create_task(&ProjectId::from("nope"), NewTask::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::ProjectNotFound(_)));
    }

    #[test]
    fn sparse_documents_read_with_defaults() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        let p = s.create_project(new_project("Alpha")).unwrap();
        let tasks_dir = dir.path().join("users/ana/projects").join(p.id.as_str()).join("tasks");
        fs::create_dir_all(&tasks_dir).unwrap();
        fs::write(tasks_dir.join("legacy.json"), r#"{"title":"Old","status":"Pendiente"}"#).unwrap();
        fs::write(tasks_dir.join("notes.txt"), "ignored").unwrap();

        let task = s.get_task(&p.id, &TaskId::from("legacy")).unwrap().unwrap();
        assert_eq!(task.title, "Old");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.tags.is_empty());
        assert_eq!(s.list_tasks(&p.id).unwrap().len(), 1);
    }

    #[test]
    fn malformed_document_is_reported() {
        let dir = TempDir::new().unwrap();
        let projects = dir.path().join("users/ana/projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(projects.join("bad.json"), "{ nope").unwrap();
        assert!(matches!(
            store(&dir).list_projects(),
            Err(StoreError::Malformed { .. })
        ));
    }
}
