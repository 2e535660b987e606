use chrono::NaiveDate;

use crate::model::{NewProject, NewTask, Project, ProjectId, Task, TaskId, TaskSummary};

use super::sample::sample_projects;
use super::{Session, Store, StoreError};

/// Projects held in memory with tasks embedded in their categories.
/// Identifiers are sequential numbers rendered as strings.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    projects: Vec<Project>,
    session: Session,
}

impl MemoryStore {
    pub fn new(projects: Vec<Project>, session: Session) -> Self {
        MemoryStore { projects, session }
    }

    /// A store preloaded with the demo projects dated around `today`
    pub fn with_sample_data(session: Session, today: NaiveDate) -> Self {
        MemoryStore::new(sample_projects(today), session)
    }

    fn project_mut(&mut self, id: &ProjectId) -> Result<&mut Project, StoreError> {
        self.projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.clone()))
    }

    fn next_project_id(&self) -> ProjectId {
        let max = self
            .projects
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        ProjectId((max + 1).to_string())
    }

    /// Task ids are unique across every project
    fn next_task_id(&self) -> TaskId {
        let max = self
            .projects
            .iter()
            .flat_map(|p| p.tasks())
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        TaskId((max + 1).to_string())
    }
}

impl Store for MemoryStore {
    fn session(&self) -> &Session {
        &self.session
    }

    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.session.user()?;
        Ok(self.projects.clone())
    }

    fn create_project(&mut self, data: NewProject) -> Result<Project, StoreError> {
        self.session.user()?;
        let project = Project::new(self.next_project_id(), data);
        tracing::info!(project = %project.id, name = %project.name, "created project");
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Replaces the project's fields. A category arriving without tasks keeps
    /// the tasks already stored under that name.
    fn update_project(&mut self, project: &Project) -> Result<(), StoreError> {
        self.session.user()?;
        let stored = self.project_mut(&project.id)?;
        let mut updated = project.clone();
        for category in &mut updated.categories {
            if category.tasks.is_empty()
                && let Some(existing) = stored.category(&category.name)
            {
                category.tasks = existing.tasks.clone();
            }
        }
        *stored = updated;
        tracing::debug!(project = %project.id, "updated project");
        Ok(())
    }

    fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskSummary>, StoreError> {
        self.session.user()?;
        Ok(self
            .projects
            .iter()
            .find(|p| &p.id == project_id)
            .map(|p| p.tasks().map(Task::summary).collect())
            .unwrap_or_default())
    }

    fn get_task(&self, project_id: &ProjectId, task_id: &TaskId) -> Result<Option<Task>, StoreError> {
        self.session.user()?;
        Ok(self
            .projects
            .iter()
            .find(|p| &p.id == project_id)
            .and_then(|p| p.find_task(task_id))
            .cloned())
    }

    fn create_task(&mut self, project_id: &ProjectId, data: NewTask) -> Result<Task, StoreError> {
        self.session.user()?;
        let id = self.next_task_id();
        let project = self.project_mut(project_id)?;
        let category = project
            .category_mut(&data.category)
            .ok_or_else(|| StoreError::CategoryNotFound(data.category.clone()))?;
        let task = Task::new(id, data);
        category.tasks.push(task.clone());
        tracing::info!(project = %project_id, task = %task.id, "created task");
        Ok(task)
    }

    /// Replaces the stored task, moving it when its category changed
    fn update_task(&mut self, project_id: &ProjectId, task: &Task) -> Result<(), StoreError> {
        self.session.user()?;
        let project = self.project_mut(project_id)?;
        if project.category(&task.category).is_none() {
            return Err(StoreError::CategoryNotFound(task.category.clone()));
        }
        let current = project
            .categories
            .iter()
            .position(|c| c.tasks.iter().any(|t| t.id == task.id))
            .ok_or_else(|| StoreError::TaskNotFound(task.id.clone()))?;

        if project.categories[current].name == task.category {
            if let Some(slot) = project.find_task_mut(&task.id) {
                *slot = task.clone();
            }
        } else {
            project.categories[current].tasks.retain(|t| t.id != task.id);
            if let Some(target) = project.category_mut(&task.category) {
                target.tasks.push(task.clone());
            }
        }
        tracing::debug!(project = %project_id, task = %task.id, "updated task");
        Ok(())
    }

    fn delete_task(&mut self, project_id: &ProjectId, task_id: &TaskId) -> Result<(), StoreError> {
        self.session.user()?;
        let project = self.project_mut(project_id)?;
        let category = project
            .categories
            .iter_mut()
            .find(|c| c.tasks.iter().any(|t| &t.id == task_id))
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        category.tasks.retain(|t| &t.id != task_id);
        tracing::info!(project = %project_id, task = %task_id, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, TaskStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::with_sample_data(Session::signed_in("ana"), today())
    }

    fn new_task(title: &str, category: &str) -> NewTask {
        NewTask {
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    #[test]
    fn anonymous_session_is_refused() {
        let mut s = MemoryStore::with_sample_data(Session::anonymous(), today());
        assert!(matches!(s.list_projects(), Err(StoreError::Unauthenticated)));
        assert!(matches!(
            s.create_project(NewProject::default()),
            Err(StoreError::Unauthenticated)
        ));
        assert!(matches!(
            s.list_tasks(&ProjectId::from("1")),
            Err(StoreError::Unauthenticated)
        ));
    }

    #[test]
    fn project_ids_are_sequential() {
        let mut s = store();
        let p = s
            .create_project(NewProject {
                name: "Project D".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(p.id, ProjectId::from("4"));
        assert_eq!(s.list_projects().unwrap().len(), 4);

        let mut empty = MemoryStore::new(Vec::new(), Session::signed_in("ana"));
        let first = empty.create_project(NewProject::default()).unwrap();
        assert_eq!(first.id, ProjectId::from("1"));
    }

    #[test]
    fn update_project_keeps_existing_tasks() {
        let mut s = store();
        let mut p = s.list_projects().unwrap().remove(0).without_tasks();
        p.categories.push(Category::new("Category 3"));
        s.update_project(&p).unwrap();

        let stored = s.list_projects().unwrap().remove(0);
        assert_eq!(stored.categories.len(), 3);
        assert_eq!(stored.tasks().count(), 3);
    }

    #[test]
    fn create_task_into_category() {
        let mut s = store();
        let pid = ProjectId::from("3");
        let mut p = s.list_projects().unwrap().remove(2);
        p.categories.push(Category::new("Inbox"));
        s.update_project(&p).unwrap();

        let t = s.create_task(&pid, new_task("Fresh", "Inbox")).unwrap();
        assert_eq!(t.id, TaskId::from("203"));
        let listed = s.list_tasks(&pid).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Fresh");

        assert!(matches!(
            s.create_task(&pid, new_task("Lost", "Nowhere")),
            Err(StoreError::CategoryNotFound(_))
        ));
        assert!(matches!(
            s.create_task(&ProjectId::from("99"), new_task("Lost", "Inbox")),
            Err(StoreError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn update_task_moves_between_categories() {
        let mut s = store();
        let pid = ProjectId::from("1");
        let mut t = s.get_task(&pid, &TaskId::from("101")).unwrap().unwrap();
        t.category = "Category 2".into();
        t.status = TaskStatus::OnHold;
        s.update_task(&pid, &t).unwrap();

        let p = s.list_projects().unwrap().remove(0);
        assert_eq!(p.category("Category 1").unwrap().tasks.len(), 1);
        let moved = &p.category("Category 2").unwrap().tasks;
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[1].status, TaskStatus::OnHold);
    }

    #[test]
    fn missing_tasks() {
        let mut s = store();
        let pid = ProjectId::from("1");
        assert!(s.get_task(&pid, &TaskId::from("999")).unwrap().is_none());
        assert!(s.list_tasks(&ProjectId::from("999")).unwrap().is_empty());
        assert!(matches!(
            s.delete_task(&pid, &TaskId::from("999")),
            Err(StoreError::TaskNotFound(_))
        ));

        s.delete_task(&pid, &TaskId::from("102")).unwrap();
        assert_eq!(s.list_tasks(&pid).unwrap().len(), 2);
    }
}
