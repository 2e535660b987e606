use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::settings::Settings;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::{Project, ProjectId, Subtask, Task, TaskId, TaskPriority, TaskStatus, TaskSummary};
use crate::nav::{Destination, History, Location, QueryParams, ViewIntent, route};
use crate::ops::classify::{Board, Bucket, classify};
use crate::ops::forms::{CategoryForm, ProjectForm, TaskForm};
use crate::ops::{progress, task_ops};
use crate::store::{Store, StoreError};

use super::form::Form;
use super::input;
use super::render;
use super::theme::Theme;

/// Shown in the status row when a store call fails. Details go to the log.
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

pub const PROJECT_FIELDS: [&str; 2] = ["Name", "Description"];
pub const CATEGORY_FIELDS: [&str; 1] = ["Name"];
pub const TASK_FIELDS: [&str; 7] = [
    "Category",
    "Title",
    "Description",
    "Assignee",
    "Due date",
    "Priority",
    "Notes",
];
pub const LOGIN_FIELDS: [&str; 1] = ["User"];

/// What the screen currently shows, with the entities it was resolved against
#[derive(Debug, Clone)]
pub enum Screen {
    ProjectList {
        cursor: usize,
    },
    Board {
        project: Project,
        tasks: Vec<TaskSummary>,
        cursor: usize,
    },
    AddProject {
        form: Form,
    },
    AddCategory {
        project: Project,
        form: Form,
    },
    AddTask {
        project: Project,
        form: Form,
    },
    TaskDetails {
        project: Project,
        task_id: TaskId,
        /// `None` when the store has no such task
        task: Option<Task>,
        cursor: usize,
        /// Title being typed for a new subtask
        new_subtask: Option<String>,
    },
    /// Shown whenever the store reports that nobody is signed in
    Login {
        form: Form,
    },
}

impl Screen {
    /// True while keystrokes go into a text field
    pub fn is_typing(&self) -> bool {
        match self {
            Screen::AddProject { .. }
            | Screen::AddCategory { .. }
            | Screen::AddTask { .. }
            | Screen::Login { .. } => true,
            Screen::TaskDetails { new_subtask, .. } => new_subtask.is_some(),
            Screen::ProjectList { .. } | Screen::Board { .. } => false,
        }
    }
}

/// Main application state
pub struct App {
    pub settings: Settings,
    pub store: Box<dyn Store>,
    /// Reference day for the board
    pub today: NaiveDate,
    pub history: History,
    pub projects: Vec<Project>,
    pub screen: Screen,
    pub theme: Theme,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Build the app and route the initial location
    pub fn new(settings: Settings, store: Box<dyn Store>, today: NaiveDate, location: QueryParams) -> Self {
        let theme = Theme::from_config(&settings.config.ui);
        let mut app = App {
            settings,
            store,
            today,
            history: History::new(location),
            projects: Vec::new(),
            screen: Screen::ProjectList { cursor: 0 },
            theme,
            notice: None,
            should_quit: false,
        };
        app.handle_navigation();
        app
    }

    // ----- Navigation -----

    /// Write the destination into the location, then re-route
    pub fn navigate(&mut self, destination: Destination) {
        self.notice = None;
        self.history
            .write_query_params(&destination.location_updates());
        self.handle_navigation();
    }

    /// Step back through history and re-route. No-op at the start.
    pub fn go_back(&mut self) {
        if self.history.back() {
            self.handle_navigation();
        }
    }

    pub fn go_forward(&mut self) {
        if self.history.forward() {
            self.handle_navigation();
        }
    }

    /// Route the current location against freshly listed projects and build
    /// the screen for the resulting view.
    pub fn handle_navigation(&mut self) {
        self.projects = match self.store.list_projects() {
            Ok(projects) => projects,
            Err(StoreError::Unauthenticated) => {
                self.store_failed(StoreError::Unauthenticated);
                return;
            }
            Err(e) => {
                self.store_failed(e);
                Vec::new()
            }
        };

        let params = self.history.read_query_params();
        let intent = route(&params, &self.projects);
        tracing::debug!(location = %params, view = %intent, "routed");

        let screen = match intent {
            ViewIntent::ShowProjectList => Ok(Screen::ProjectList { cursor: 0 }),
            ViewIntent::ShowProjectDetails(project) => {
                self.store.list_tasks(&project.id).map(|tasks| Screen::Board {
                    project: project.clone(),
                    tasks,
                    cursor: 0,
                })
            }
            ViewIntent::ShowAddProjectForm => Ok(Screen::AddProject {
                form: Form::new(&PROJECT_FIELDS),
            }),
            ViewIntent::ShowAddCategoryForm(project) => Ok(Screen::AddCategory {
                project: project.clone(),
                form: Form::new(&CATEGORY_FIELDS),
            }),
            ViewIntent::ShowAddTaskForm(project) => {
                let first_category = project
                    .categories
                    .first()
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                Ok(Screen::AddTask {
                    project: project.clone(),
                    form: Form::new(&TASK_FIELDS)
                        .with_value(0, first_category)
                        .with_value(5, TaskPriority::default().label()),
                })
            }
            ViewIntent::ShowTaskDetails(project, task_id) => {
                self.store.get_task(&project.id, &task_id).map(|task| {
                    if task.is_none() {
                        tracing::warn!(project = %project.id, task = %task_id, "task not found");
                    }
                    Screen::TaskDetails {
                        project: project.clone(),
                        task_id,
                        task,
                        cursor: 0,
                        new_subtask: None,
                    }
                })
            }
        };

        match screen {
            Ok(screen) => self.screen = screen,
            Err(StoreError::Unauthenticated) => self.store_failed(StoreError::Unauthenticated),
            Err(e) => {
                self.store_failed(e);
                self.screen = Screen::ProjectList { cursor: 0 };
            }
        }
    }

    /// Surface a store error: a login prompt when signed out, otherwise the
    /// generic notice.
    pub fn store_failed(&mut self, err: StoreError) {
        match err {
            StoreError::Unauthenticated => {
                tracing::info!("not signed in, showing login");
                self.screen = Screen::Login {
                    form: Form::new(&LOGIN_FIELDS),
                };
            }
            other => {
                tracing::error!(error = %other, "store call failed");
                self.notice = Some(FAILURE_NOTICE.to_string());
            }
        }
    }

    // ----- Board -----

    pub fn closed_policy(&self) -> crate::ops::classify::ClosedTasks {
        self.settings.closed_tasks(false)
    }

    /// The board for the current tasks, in display order
    pub fn board<'a>(&self, tasks: &'a [TaskSummary]) -> Board<'a, TaskSummary> {
        classify(tasks, self.today, self.closed_policy())
    }

    /// Task id under the board cursor
    pub fn board_selection(&self) -> Option<TaskId> {
        let Screen::Board { tasks, cursor, .. } = &self.screen else {
            return None;
        };
        board_order(&self.board(tasks))
            .get(*cursor)
            .map(|t| t.id.clone())
    }

    pub fn board_len(&self) -> usize {
        match &self.screen {
            Screen::Board { tasks, .. } => board_order(&self.board(tasks)).len(),
            _ => 0,
        }
    }

    // ----- Form submission -----

    pub fn submit_project(&mut self) {
        let Screen::AddProject { form } = &mut self.screen else {
            return;
        };
        let data = match (ProjectForm {
            name: form.value(0).to_string(),
            description: form.value(1).to_string(),
        })
        .validate()
        {
            Ok(data) => data,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        match self.store.create_project(data) {
            Ok(project) => self.navigate(Destination::ProjectDetails(project.id)),
            Err(e) => self.store_failed(e),
        }
    }

    pub fn submit_category(&mut self) {
        let Screen::AddCategory { project, form } = &mut self.screen else {
            return;
        };
        let category = match (CategoryForm {
            name: form.value(0).to_string(),
        })
        .validate()
        {
            Ok(c) => c,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let mut updated = project.clone();
        updated.categories.push(category);
        match self.store.update_project(&updated) {
            Ok(()) => self.navigate(Destination::ProjectDetails(updated.id)),
            Err(e) => self.store_failed(e),
        }
    }

    pub fn submit_task(&mut self) {
        let Screen::AddTask { project, form } = &mut self.screen else {
            return;
        };
        let priority = match form.value(5).parse::<TaskPriority>() {
            Ok(p) => p,
            Err(e) => {
                form.error = Some(e);
                return;
            }
        };
        let task_form = TaskForm {
            category: form.value(0).to_string(),
            title: form.value(1).to_string(),
            description: form.value(2).to_string(),
            assignee: form.value(3).to_string(),
            due_date: form.value(4).to_string(),
            priority,
            notes: form.value(6).to_string(),
        };
        let data = match task_form.validate(project, self.today) {
            Ok(data) => data,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let project_id = project.id.clone();
        match self.store.create_task(&project_id, data) {
            Ok(_) => self.navigate(Destination::ProjectDetails(project_id)),
            Err(e) => self.store_failed(e),
        }
    }

    /// Sign in, remember the user in the config file, and re-route the
    /// location that needed a session.
    pub fn submit_login(&mut self) {
        let Screen::Login { form } = &mut self.screen else {
            return;
        };
        let user = form.value(0).trim().to_string();
        if user.is_empty() {
            form.error = Some("user name is required".to_string());
            return;
        }
        if let Err(e) = remember_user(&self.settings, &user) {
            tracing::warn!(error = %e, "could not save session to config");
        }
        self.settings.config.session.user = Some(user);
        self.store = self.settings.open_store(self.today);
        self.notice = None;
        self.handle_navigation();
    }

    // ----- Task details -----

    /// Apply `edit` to the task on the details screen and persist it.
    /// The screen keeps the old task when the store refuses the update.
    fn edit_current_task<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Task) -> Result<(), task_ops::TaskError>,
    {
        let Screen::TaskDetails {
            project,
            task: Some(task),
            ..
        } = &mut self.screen
        else {
            return;
        };
        let mut updated = task.clone();
        if let Err(e) = edit(&mut updated) {
            self.notice = Some(e.to_string());
            return;
        }
        match self.store.update_task(&project.id, &updated) {
            Ok(()) => {
                *task = updated;
                self.notice = None;
            }
            Err(e) => self.store_failed(e),
        }
    }

    pub fn toggle_selected_subtask(&mut self) {
        let Screen::TaskDetails { cursor, .. } = &self.screen else {
            return;
        };
        let index = *cursor;
        self.edit_current_task(|task| progress::toggle_subtask(task, index).map(|_| ()));
    }

    /// Commit the subtask being typed. An empty title just closes the input.
    pub fn commit_new_subtask(&mut self) {
        let Screen::TaskDetails { new_subtask, .. } = &mut self.screen else {
            return;
        };
        let title = new_subtask.take().unwrap_or_default().trim().to_string();
        if title.is_empty() {
            return;
        }
        self.edit_current_task(|task| {
            progress::add_subtask(task, Subtask::new(title, ""));
            Ok(())
        });
        if let Screen::TaskDetails {
            task: Some(task),
            cursor,
            ..
        } = &mut self.screen
        {
            *cursor = task.subtasks.len().saturating_sub(1);
        }
    }

    pub fn cycle_status(&mut self) {
        self.edit_current_task(|task| {
            let next = next_in(&TaskStatus::ALL, task.status);
            task_ops::set_status(task, next);
            Ok(())
        });
    }

    pub fn cycle_priority(&mut self) {
        self.edit_current_task(|task| {
            let next = next_in(&TaskPriority::ALL, task.priority);
            task_ops::set_priority(task, next);
            Ok(())
        });
    }

    /// Current location, for display and for the saved UI state
    pub fn location(&self) -> QueryParams {
        self.history.read_query_params()
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        match &self.screen {
            Screen::Board { project, .. }
            | Screen::AddCategory { project, .. }
            | Screen::AddTask { project, .. }
            | Screen::TaskDetails { project, .. } => Some(&project.id),
            _ => None,
        }
    }
}

/// Board entries flattened in display order: the dated buckets, then the
/// tasks without a usable due date.
pub fn board_order<'a>(board: &Board<'a, TaskSummary>) -> Vec<&'a TaskSummary> {
    Bucket::ALL
        .iter()
        .flat_map(|b| board.bucket(*b).iter())
        .chain(board.unscheduled.iter())
        .map(|e| e.task)
        .collect()
}

fn next_in<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(i + 1) % all.len()]
}

fn remember_user(settings: &Settings, user: &str) -> Result<(), config_io::ConfigError> {
    let (_, mut doc) = config_io::read_config(&settings.config_path)?;
    config_io::set_session_user(&mut doc, user);
    config_io::write_config(&settings.config_path, &doc)
}

// ----- UI state -----

/// Saved location to start from, unless it belongs to another user
fn restore_location(settings: &Settings) -> QueryParams {
    let Some(state) = read_ui_state(&settings.data_dir) else {
        return QueryParams::new();
    };
    if state.user != settings.config.session.user {
        tracing::debug!("saved location belongs to another session, starting at the project list");
        return QueryParams::new();
    }
    QueryParams::parse(&state.location)
}

fn save_ui_state(app: &App) {
    let state = UiState {
        location: app.location().to_query_string(),
        user: app.settings.config.session.user.clone(),
    };
    if let Err(e) = write_ui_state(&app.settings.data_dir, &state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application. Starts at `location` if given, else where the
/// last session left off.
pub fn run(settings: &Settings, location: Option<QueryParams>) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    let location = location.unwrap_or_else(|| restore_location(settings));
    let store = settings.open_store(today);
    let mut app = App::new(settings.clone(), store, today, location);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{test_app, test_app_at};
    use tempfile::TempDir;

    #[test]
    fn starts_at_routed_location() {
        let app = test_app_at("?page=projectDetails&projectId=2");
        match &app.screen {
            Screen::Board { project, tasks, .. } => {
                assert_eq!(project.name, "Project B");
                assert_eq!(tasks.len(), 2);
            }
            other => panic!("expected board, got {:?}", other),
        }
    }

    #[test]
    fn unknown_project_falls_back_to_list() {
        let app = test_app_at("?page=projectDetails&projectId=42");
        assert!(matches!(app.screen, Screen::ProjectList { .. }));
    }

    #[test]
    fn missing_task_keeps_details_screen() {
        let app = test_app_at("?page=taskDetails&projectId=1&taskId=nope");
        match &app.screen {
            Screen::TaskDetails { task, task_id, .. } => {
                assert!(task.is_none());
                assert_eq!(task_id.as_str(), "nope");
            }
            other => panic!("expected task details, got {:?}", other),
        }
    }

    #[test]
    fn navigation_writes_location_and_history() {
        let mut app = test_app();
        app.navigate(Destination::TaskDetails(ProjectId::from("1"), TaskId::from("101")));
        assert_eq!(
            app.location().to_query_string(),
            "page=taskDetails&projectId=1&taskId=101"
        );
        app.navigate(Destination::ProjectDetails(ProjectId::from("1")));
        assert_eq!(app.location().to_query_string(), "page=projectDetails&projectId=1");
        assert!(matches!(app.screen, Screen::Board { .. }));

        app.go_back();
        assert!(matches!(app.screen, Screen::TaskDetails { .. }));
        app.go_back();
        assert!(matches!(app.screen, Screen::ProjectList { .. }));
        app.go_back();
        assert!(matches!(app.screen, Screen::ProjectList { .. }));
        app.go_forward();
        assert!(matches!(app.screen, Screen::TaskDetails { .. }));
    }

    #[test]
    fn board_cursor_follows_display_order() {
        let app = test_app_at("?page=projectDetails&projectId=1");
        // 101 due today, 102 this week, 103 completed and hidden
        assert_eq!(app.board_len(), 2);
        assert_eq!(app.board_selection(), Some(TaskId::from("101")));
    }

    #[test]
    fn invalid_project_form_stays_put() {
        let mut app = test_app_at("?page=addProject");
        app.submit_project();
        match &app.screen {
            Screen::AddProject { form } => {
                assert_eq!(form.error.as_deref(), Some("project name is required"))
            }
            other => panic!("expected form, got {:?}", other),
        }
        assert_eq!(app.projects.len(), 3);
    }

    #[test]
    fn project_form_creates_and_opens_board() {
        let mut app = test_app_at("?page=addProject");
        if let Screen::AddProject { form } = &mut app.screen {
            form.fields[0].value = "  Project D ".into();
        }
        app.submit_project();
        match &app.screen {
            Screen::Board { project, .. } => assert_eq!(project.name, "Project D"),
            other => panic!("expected board, got {:?}", other),
        }
        assert_eq!(app.location().get("projectId"), Some("4"));
    }

    #[test]
    fn category_form_adds_category() {
        let mut app = test_app_at("?page=addCategory&projectId=3");
        if let Screen::AddCategory { form, .. } = &mut app.screen {
            form.fields[0].value = "Backlog".into();
        }
        app.submit_category();
        match &app.screen {
            Screen::Board { project, .. } => {
                assert_eq!(project.categories.len(), 1);
                assert_eq!(project.categories[0].name, "Backlog");
            }
            other => panic!("expected board, got {:?}", other),
        }
    }

    #[test]
    fn task_form_validates_then_creates() {
        let mut app = test_app_at("?page=addTask&projectId=1");
        app.submit_task();
        if let Screen::AddTask { form, .. } = &mut app.screen {
            assert_eq!(form.error.as_deref(), Some("task title is required"));
            assert_eq!(form.value(0), "Category 1");
            form.fields[1].value = "Write notes".into();
            form.fields[4].value = "2025-04-01".into();
        } else {
            panic!("expected task form");
        }
        app.submit_task();
        match &app.screen {
            Screen::Board { tasks, .. } => {
                assert!(tasks.iter().any(|t| t.title == "Write notes"));
            }
            other => panic!("expected board, got {:?}", other),
        }
    }

    #[test]
    fn subtask_toggle_persists_progress() {
        let mut app = test_app_at("?page=taskDetails&projectId=1&taskId=102");
        if let Screen::TaskDetails { cursor, .. } = &mut app.screen {
            *cursor = 1;
        }
        app.toggle_selected_subtask();
        let stored = app
            .store
            .get_task(&ProjectId::from("1"), &TaskId::from("102"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.progress, 100);
        match &app.screen {
            Screen::TaskDetails { task: Some(t), .. } => assert_eq!(t.progress, 100),
            other => panic!("expected task details, got {:?}", other),
        }
    }

    #[test]
    fn new_subtask_lowers_progress() {
        let mut app = test_app_at("?page=taskDetails&projectId=2&taskId=202");
        if let Screen::TaskDetails { new_subtask, .. } = &mut app.screen {
            *new_subtask = Some("Follow up".into());
        }
        app.commit_new_subtask();
        match &app.screen {
            Screen::TaskDetails {
                task: Some(t),
                cursor,
                new_subtask,
                ..
            } => {
                assert_eq!(t.subtasks.len(), 5);
                assert_eq!(t.progress, 20);
                assert_eq!(*cursor, 4);
                assert!(new_subtask.is_none());
            }
            other => panic!("expected task details, got {:?}", other),
        }
    }

    #[test]
    fn status_cycles_and_persists() {
        let mut app = test_app_at("?page=taskDetails&projectId=1&taskId=101");
        app.cycle_status();
        app.cycle_priority();
        let stored = app
            .store
            .get_task(&ProjectId::from("1"), &TaskId::from("101"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, TaskStatus::InProgress);
        assert_eq!(stored.priority, TaskPriority::Medium);
        assert!(stored.completed_at.is_none());
    }

    #[test]
    fn signed_out_shows_login_then_resumes() {
        let dir = TempDir::new().unwrap();
        let mut app = crate::tui::render::test_helpers::signed_out_app(dir.path(), "?page=projectDetails&projectId=2");
        assert!(matches!(app.screen, Screen::Login { .. }));

        app.submit_login();
        assert!(matches!(app.screen, Screen::Login { .. }));

        if let Screen::Login { form } = &mut app.screen {
            form.fields[0].value = "ana".into();
        }
        app.submit_login();
        assert!(matches!(app.screen, Screen::Board { .. }));
        let saved = std::fs::read_to_string(dir.path().join("taskboard.toml")).unwrap();
        assert!(saved.contains("user = \"ana\""));
    }

    #[test]
    fn store_failure_sets_generic_notice() {
        let mut app = test_app();
        app.store_failed(StoreError::TaskNotFound(TaskId::from("9")));
        assert_eq!(app.notice.as_deref(), Some(FAILURE_NOTICE));
    }

    #[test]
    fn ui_state_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut app = crate::tui::render::test_helpers::signed_out_app(dir.path(), "");
        if let Screen::Login { form } = &mut app.screen {
            form.fields[0].value = "ana".into();
        }
        app.submit_login();
        app.navigate(Destination::ProjectDetails(ProjectId::from("2")));
        save_ui_state(&app);

        let restored = restore_location(&app.settings);
        assert_eq!(restored.to_query_string(), "page=projectDetails&projectId=2");

        let mut other = app.settings.clone();
        other.config.session.user = Some("luis".into());
        assert!(restore_location(&other).is_empty());
    }
}
