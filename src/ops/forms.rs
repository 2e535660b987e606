//! Typed form payloads for the add-project, add-category and add-task screens.
//!
//! Each form validates into a creation payload before anything reaches a store,
//! so a rejected form never partially persists.

use chrono::NaiveDate;

use crate::model::{Category, NewProject, NewTask, Project, TaskPriority, TaskStatus, parse_due_date};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("project name is required")]
    EmptyProjectName,
    #[error("category name is required")]
    EmptyCategoryName,
    #[error("task title is required")]
    EmptyTaskTitle,
    #[error("a category is required")]
    EmptyCategory,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<NewProject, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        Ok(NewProject {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            categories: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    /// Duplicate names are allowed; categories are unique by convention only.
    pub fn validate(&self) -> Result<Category, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(Category::new(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub category: String,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub due_date: String,
    pub priority: TaskPriority,
    pub notes: String,
}

impl TaskForm {
    /// Build a new pending task for `project`, created on `today`.
    pub fn validate(&self, project: &Project, today: NaiveDate) -> Result<NewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTaskTitle);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if project.category(category).is_none() {
            return Err(ValidationError::UnknownCategory(category.to_string()));
        }
        let due_date = self.due_date.trim();
        if !due_date.is_empty() && parse_due_date(due_date).is_none() {
            return Err(ValidationError::InvalidDueDate(due_date.to_string()));
        }

        Ok(NewTask {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            assignee: self.assignee.trim().to_string(),
            due_date: due_date.to_string(),
            status: TaskStatus::Pending,
            priority: self.priority,
            category: category.to_string(),
            tags: Vec::new(),
            created_at: today.format("%Y-%m-%d").to_string(),
            completed_at: None,
            comments: Vec::new(),
            subtasks: Vec::new(),
            progress: 0,
            attachments: Vec::new(),
            notes: self.notes.trim().to_string(),
        })
    }
}
