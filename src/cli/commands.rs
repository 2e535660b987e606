use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::config::Backend;

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - projects and tasks by due date"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/taskboard/taskboard.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Storage backend, overriding [store] backend
    #[arg(long, global = true, value_enum)]
    pub store: Option<Backend>,

    /// Data directory, overriding [store] data_dir
    #[arg(long = "data-dir", global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the board at a location, e.g. "?page=projectDetails&projectId=1"
    Open(QueryArg),
    /// Show which view a location resolves to
    Route(QueryArg),
    /// List projects
    Projects,
    /// Project management
    Project(ProjectCmd),
    /// Category management
    Category(CategoryCmd),
    /// List a project's tasks
    Tasks(ProjectArg),
    /// Show a project's tasks grouped by due date
    Board(BoardArgs),
    /// Task management
    Task(TaskCmd),
    /// Subtask management
    Subtask(SubtaskCmd),
    /// Sign in as a user
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Load the demo projects into the store
    Seed(SeedArgs),
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct QueryArg {
    /// Query string; the leading '?' is optional
    pub query: String,
}

#[derive(Args)]
pub struct ProjectArg {
    /// Project ID
    pub project: String,
}

#[derive(Args)]
pub struct TaskRef {
    /// Project ID
    pub project: String,
    /// Task ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardArgs {
    /// Project ID
    pub project: String,
    /// Reference day (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub today: Option<String>,
    /// Also show completed and cancelled tasks
    #[arg(long)]
    pub include_closed: bool,
}

// ---------------------------------------------------------------------------
// Project / category args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add(ProjectAddArgs),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,
    /// Project description
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category to a project
    Add(CategoryAddArgs),
}

#[derive(Args)]
pub struct CategoryAddArgs {
    /// Project ID
    pub project: String,
    /// Category name
    pub name: String,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show task details
    Show(TaskRef),
    /// Create a task
    Add(TaskAddArgs),
    /// Change a task's status
    Status(TaskStatusArgs),
    /// Change a task's priority
    Priority(TaskPriorityArgs),
    /// Add a comment
    Comment(TaskTextArgs),
    /// Add a tag
    Tag(TaskTextArgs),
    /// Permanently delete a task
    Delete(TaskRef),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Project ID
    pub project: String,
    /// Category the task belongs to
    pub category: String,
    /// Task title
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub assignee: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub due: String,
    /// High, Medium or Low
    #[arg(long, default_value = "Medium")]
    pub priority: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct TaskStatusArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// New status, e.g. "In Progress"
    pub status: String,
}

#[derive(Args)]
pub struct TaskPriorityArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// High, Medium or Low
    pub priority: String,
}

#[derive(Args)]
pub struct TaskTextArgs {
    #[command(flatten)]
    pub task: TaskRef,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Subtask args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubtaskCmd {
    #[command(subcommand)]
    pub action: SubtaskAction,
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Append a subtask
    Add(SubtaskAddArgs),
    /// Flip a subtask between done and not done
    Toggle(SubtaskToggleArgs),
}

#[derive(Args)]
pub struct SubtaskAddArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// Subtask title
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct SubtaskToggleArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// Position of the subtask, starting at 1
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Session / maintenance args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// User name
    pub user: String,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Day the demo dates are laid out around (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub today: Option<String>,
}
