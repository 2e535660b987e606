use serde::Serialize;

use crate::model::{Project, Task, TaskSummary};
use crate::nav::{Page, ViewIntent};
use crate::ops::classify::{Board, BoardEntry, Bucket};
use crate::ops::task_ops::category_label;
use crate::util::unicode::fit_to_width;

const STATUS_COLUMN: usize = 13;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardJson {
    pub project_id: String,
    pub reference: String,
    pub today: Vec<TaskSummary>,
    pub this_week: Vec<TaskSummary>,
    pub this_month: Vec<TaskSummary>,
    pub later: Vec<TaskSummary>,
    pub unscheduled: Vec<TaskSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteJson {
    pub view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Canonical query string for the resolved view
    pub location: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn project_to_json(project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id.to_string(),
        name: project.name.clone(),
        description: project.description.clone(),
        categories: project.categories.iter().map(|c| c.name.clone()).collect(),
    }
}

pub fn board_to_json(project: &Project, reference: &str, board: &Board<'_, TaskSummary>) -> BoardJson {
    let list = |entries: &[BoardEntry<'_, TaskSummary>]| -> Vec<TaskSummary> {
        entries.iter().map(|e| e.task.clone()).collect()
    };
    BoardJson {
        project_id: project.id.to_string(),
        reference: reference.to_string(),
        today: list(&board.today),
        this_week: list(&board.this_week),
        this_month: list(&board.this_month),
        later: list(&board.later),
        unscheduled: list(&board.unscheduled),
    }
}

pub fn route_to_json(intent: &ViewIntent<'_>) -> RouteJson {
    let task_id = match intent {
        ViewIntent::ShowTaskDetails(_, t) => Some(t.to_string()),
        _ => None,
    };
    RouteJson {
        view: intent.to_string(),
        page: intent.page(),
        project_id: intent.project().map(|p| p.id.to_string()),
        task_id,
        location: intent.destination().to_params().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn format_project_line(project: &Project) -> String {
    let n = project.categories.len();
    format!(
        "  {}  {}  ({} {})",
        project.id,
        project.name,
        n,
        if n == 1 { "category" } else { "categories" }
    )
}

/// One task row: status column, id, title, then due date and category when set
pub fn format_task_line(project: &Project, task: &TaskSummary) -> String {
    let mut line = format!(
        "[{}] {}  {}",
        fit_to_width(task.status.label(), STATUS_COLUMN),
        task.id,
        task.title
    );
    if !task.due_date.is_empty() {
        line.push_str(&format!("  due {}", task.due_date));
    }
    line.push_str(&format!("  ({})", category_label(project, &task.category)));
    line
}

pub fn format_board(project: &Project, board: &Board<'_, TaskSummary>) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", project.name, project.id)];
    let mut section = |heading: &str, entries: &[BoardEntry<'_, TaskSummary>]| {
        lines.push(String::new());
        lines.push(format!("-- {} --", heading));
        if entries.is_empty() {
            lines.push("  (none)".to_string());
        }
        for entry in entries {
            lines.push(format!("  {}", format_task_line(project, entry.task)));
        }
    };
    for bucket in Bucket::ALL {
        section(bucket.heading(), board.bucket(bucket));
    }
    if !board.unscheduled.is_empty() {
        section("No usable due date", &board.unscheduled);
    }
    lines
}

pub fn format_task_detail(project: &Project, task: &Task) -> Vec<String> {
    let mut lines = vec![format!("[{}] {}  {}", task.status, task.id, task.title)];
    lines.push(format!("project: {} ({})", project.name, project.id));
    lines.push(format!("category: {}", category_label(project, &task.category)));
    lines.push(format!("priority: {}", task.priority));
    lines.push(format!("progress: {}%", task.progress));

    let optional = [
        ("assignee", &task.assignee),
        ("due", &task.due_date),
        ("created", &task.created_at),
    ];
    for (label, value) in optional {
        if !value.is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }
    if let Some(done) = &task.completed_at {
        lines.push(format!("completed: {}", done));
    }
    if !task.tags.is_empty() {
        lines.push(format!(
            "tags: {}",
            task.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    if !task.description.is_empty() {
        lines.push("description:".to_string());
        lines.extend(task.description.lines().map(|l| format!("  {}", l)));
    }
    if !task.notes.is_empty() {
        lines.push("notes:".to_string());
        lines.extend(task.notes.lines().map(|l| format!("  {}", l)));
    }
    for a in &task.attachments {
        lines.push(format!("attachment: {}", a));
    }
    if !task.subtasks.is_empty() {
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        for (i, sub) in task.subtasks.iter().enumerate() {
            let mark = if sub.completed { "x" } else { " " };
            lines.push(format!("  {}. [{}] {}", i + 1, mark, sub.title));
        }
    }
    if !task.comments.is_empty() {
        lines.push(String::new());
        lines.push("comments:".to_string());
        lines.extend(task.comments.iter().map(|c| format!("  - {}", c)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, NewProject, NewTask, ProjectId, Subtask, TaskId, TaskStatus};
    use crate::ops::classify::{ClosedTasks, classify};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn project() -> Project {
        Project::new(
            ProjectId::from("1"),
            NewProject {
                name: "Launch".into(),
                description: String::new(),
                categories: vec![Category::new("Design")],
            },
        )
    }

    fn summary(id: &str, due: &str, category: &str) -> TaskSummary {
        Task::new(
            TaskId::from(id),
            NewTask {
                title: format!("Task {}", id),
                due_date: due.into(),
                category: category.into(),
                ..Default::default()
            },
        )
        .summary()
    }

    #[test]
    fn task_line_columns() {
        let p = project();
        assert_eq!(
            format_task_line(&p, &summary("7", "2025-04-01", "Design")),
            "[Pending      ] 7  Task 7  due 2025-04-01  (Design)"
        );
        assert_eq!(
            format_task_line(&p, &summary("8", "", "Gone")),
            "[Pending      ] 8  Task 8  (No category)"
        );
    }

    #[test]
    fn board_lists_every_bucket() {
        let p = project();
        let tasks = vec![
            summary("1", "2025-04-01", "Design"),
            summary("2", "2025-03-01", "Design"),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let board = classify(&tasks, today, ClosedTasks::Exclude);
        let lines = format_board(&p, &board);
        assert_eq!(lines[0], "== Launch (1) ==");
        assert!(lines.contains(&"-- Due today --".to_string()));
        assert!(lines.contains(&"-- Due later --".to_string()));
        assert!(lines.contains(&"-- No usable due date --".to_string()));
        assert_eq!(lines.iter().filter(|l| *l == "  (none)").count(), 3);
    }

    #[test]
    fn detail_shows_numbered_subtasks() {
        let p = project();
        let mut t = Task::new(
            TaskId::from("9"),
            NewTask {
                title: "Ship".into(),
                status: TaskStatus::InProgress,
                category: "Design".into(),
                progress: 50,
                ..Default::default()
            },
        );
        t.subtasks = vec![Subtask::new("a", ""), Subtask::new("b", "")];
        t.subtasks[0].completed = true;
        let lines = format_task_detail(&p, &t);
        assert_eq!(lines[0], "[In Progress] 9  Ship");
        assert!(lines.contains(&"progress: 50%".to_string()));
        assert!(lines.contains(&"  1. [x] a".to_string()));
        assert!(lines.contains(&"  2. [ ] b".to_string()));
    }

    #[test]
    fn route_json_carries_location() {
        let ps = vec![project()];
        let intent = ViewIntent::ShowTaskDetails(&ps[0], TaskId::from("5"));
        let json = serde_json::to_value(route_to_json(&intent)).unwrap();
        assert_eq!(json["page"], "taskDetails");
        assert_eq!(json["projectId"], "1");
        assert_eq!(json["taskId"], "5");
        assert_eq!(json["location"], "?page=taskDetails&projectId=1&taskId=5");
    }
}
