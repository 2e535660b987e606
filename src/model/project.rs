use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

/// Project identifier, unique across the collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// A named group of tasks within a project.
///
/// In the in-memory store the category owns its tasks. In the document store
/// tasks live in their own collection and only reference the category by name,
/// so `tasks` stays empty there.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// A project with its categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(flatten)]
    pub fields: NewProject,
}

impl std::ops::Deref for Project {
    type Target = NewProject;

    fn deref(&self) -> &NewProject {
        &self.fields
    }
}

impl std::ops::DerefMut for Project {
    fn deref_mut(&mut self) -> &mut NewProject {
        &mut self.fields
    }
}

impl Project {
    pub fn new(id: ProjectId, fields: NewProject) -> Self {
        Project { id, fields }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// Iterate embedded tasks in category order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.categories.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    pub fn find_task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.tasks.iter_mut())
            .find(|t| &t.id == id)
    }

    /// Same project with embedded task lists emptied (the stored project document)
    pub fn without_tasks(&self) -> Project {
        let mut doc = self.clone();
        for category in &mut doc.categories {
            category.tasks.clear();
        }
        doc
    }
}

/// Project payload without an identifier
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub categories: Vec<Category>,
}

/// Linear lookup by exact identifier equality
pub fn find_project<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id.as_str() == id)
}
