use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Pending", alias = "Pendiente")]
    Pending,
    #[serde(rename = "In Progress", alias = "En Proceso", alias = "En progreso")]
    InProgress,
    #[serde(rename = "Completed", alias = "Completada")]
    Completed,
    #[serde(rename = "Cancelled", alias = "Cancelada")]
    Cancelled,
    #[serde(rename = "Delayed", alias = "Retrasada")]
    Delayed,
    #[serde(rename = "On Hold", alias = "En Espera")]
    OnHold,
    #[serde(rename = "To Schedule", alias = "A Programar")]
    ToSchedule,
    #[serde(rename = "In Validation", alias = "En Validación")]
    InValidation,
    #[serde(rename = "Approved", alias = "Aprobada")]
    Approved,
    #[serde(rename = "Future Task", alias = "Tarea Futura")]
    FutureTask,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 10] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
        TaskStatus::Delayed,
        TaskStatus::OnHold,
        TaskStatus::ToSchedule,
        TaskStatus::InValidation,
        TaskStatus::Approved,
        TaskStatus::FutureTask,
    ];

    /// Human-readable label, also the serialized form
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
            TaskStatus::Delayed => "Delayed",
            TaskStatus::OnHold => "On Hold",
            TaskStatus::ToSchedule => "To Schedule",
            TaskStatus::InValidation => "In Validation",
            TaskStatus::Approved => "Approved",
            TaskStatus::FutureTask => "Future Task",
        }
    }

    /// Completed and cancelled tasks are off the board
    pub fn is_closed(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        TaskStatus::ALL
            .into_iter()
            .find(|status| normalize_label(status.label()) == wanted)
            .ok_or_else(|| {
                format!(
                    "invalid status '{}' (expected one of: {})",
                    s,
                    TaskStatus::ALL
                        .iter()
                        .map(|st| st.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "High", alias = "Alta")]
    High,
    #[default]
    #[serde(rename = "Medium", alias = "Media")]
    Medium,
    #[serde(rename = "Low", alias = "Baja")]
    Low,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        TaskPriority::ALL
            .into_iter()
            .find(|p| normalize_label(p.label()) == wanted)
            .ok_or_else(|| format!("invalid priority '{}' (expected high, medium or low)", s))
    }
}

/// Lowercase and drop separators so `in-progress`, `In Progress` and `in_progress` compare equal
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Task identifier, unique within a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// A checklist item owned by its task
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Subtask {
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }
}

/// A task with every stored field. Absent document fields fall back to defaults on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(flatten)]
    pub fields: NewTask,
}

impl std::ops::Deref for Task {
    type Target = NewTask;

    fn deref(&self) -> &NewTask {
        &self.fields
    }
}

impl std::ops::DerefMut for Task {
    fn deref_mut(&mut self) -> &mut NewTask {
        &mut self.fields
    }
}

impl Task {
    pub fn new(id: TaskId, fields: NewTask) -> Self {
        Task { id, fields }
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            due_date: self.due_date.clone(),
            status: self.status,
            priority: self.priority,
            category: self.category.clone(),
        }
    }
}

/// Task payload without an identifier, as submitted for creation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assignee: String,
    /// `YYYY-MM-DD`, possibly empty
    pub due_date: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Name of a category in the owning project (a label, not an ownership link)
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub comments: Vec<String>,
    pub subtasks: Vec<Subtask>,
    /// 0..=100
    pub progress: u8,
    pub attachments: Vec<String>,
    pub notes: String,
}

/// The listing shape returned when enumerating a project's tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: String,
}

/// Parse a due date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part).
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
