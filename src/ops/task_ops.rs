use crate::model::{Project, Task, TaskPriority, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("no subtask at position {}", .0 + 1)]
    SubtaskOutOfRange(usize),
    #[error("comment is empty")]
    EmptyComment,
    #[error("tag is empty")]
    EmptyTag,
}

/// Label shown for tasks whose category matches nothing in the project
pub const NO_CATEGORY: &str = "No category";

/// The category name to display for a task's `category` field. The field is
/// only a label; one that names no category of the project reads as "No category".
pub fn category_label<'a>(project: &'a Project, category: &str) -> &'a str {
    project
        .category(category)
        .map(|c| c.name.as_str())
        .unwrap_or(NO_CATEGORY)
}

/// Set the status. `completed_at` is left as is.
pub fn set_status(task: &mut Task, status: TaskStatus) -> bool {
    if task.status == status {
        return false;
    }
    task.status = status;
    true
}

pub fn set_priority(task: &mut Task, priority: TaskPriority) -> bool {
    if task.priority == priority {
        return false;
    }
    task.priority = priority;
    true
}

pub fn add_comment(task: &mut Task, comment: &str) -> Result<(), TaskError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(TaskError::EmptyComment);
    }
    task.comments.push(comment.to_string());
    Ok(())
}

/// Add a tag (a leading `#` is dropped). Returns false if already present.
pub fn add_tag(task: &mut Task, tag: &str) -> Result<bool, TaskError> {
    let tag = tag.trim().trim_start_matches('#');
    if tag.is_empty() {
        return Err(TaskError::EmptyTag);
    }
    if task.tags.iter().any(|t| t == tag) {
        return Ok(false);
    }
    task.tags.push(tag.to_string());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, NewProject, NewTask, ProjectId, TaskId};

    fn task(category: &str) -> Task {
        Task::new(
            TaskId::from("7"),
            NewTask {
                title: "T".into(),
                category: category.into(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn category_label_joins_on_name() {
        let project = Project::new(
            ProjectId::from("1"),
            NewProject {
                name: "P".into(),
                description: String::new(),
                categories: vec![Category::new("Design")],
            },
        );
        assert_eq!(category_label(&project, &task("Design").category), "Design");
        assert_eq!(category_label(&project, &task("Renamed").category), NO_CATEGORY);
        assert_eq!(category_label(&project, &task("").category), NO_CATEGORY);
    }

    #[test]
    fn set_status_keeps_completed_at() {
        let mut t = task("");
        assert!(set_status(&mut t, TaskStatus::Completed));
        assert!(!set_status(&mut t, TaskStatus::Completed));
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn set_priority_reports_change() {
        let mut t = task("");
        assert!(!set_priority(&mut t, TaskPriority::Medium));
        assert!(set_priority(&mut t, TaskPriority::Low));
        assert_eq!(t.priority, TaskPriority::Low);
    }

    #[test]
    fn comments_and_tags() {
        let mut t = task("");
        add_comment(&mut t, "  check with client ").unwrap();
        assert_eq!(t.comments, vec!["check with client"]);
        assert!(matches!(add_comment(&mut t, "  "), Err(TaskError::EmptyComment)));

        assert!(add_tag(&mut t, "#urgent").unwrap());
        assert!(!add_tag(&mut t, "urgent").unwrap());
        assert!(matches!(add_tag(&mut t, "#"), Err(TaskError::EmptyTag)));
        assert_eq!(t.tags, vec!["urgent"]);
    }

    #[test]
    fn subtask_error_is_one_based() {
        assert_eq!(
            TaskError::SubtaskOutOfRange(2).to_string(),
            "no subtask at position 3"
        );
    }
}
