use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::settings::Settings;
use crate::logging;
use crate::model::config::Backend;
use crate::model::{Project, ProjectId, Subtask, Task, TaskId, TaskPriority, TaskStatus, find_project};
use crate::nav::{QueryParams, route};
use crate::ops::classify::classify;
use crate::ops::forms::{CategoryForm, ProjectForm, TaskForm};
use crate::ops::{progress, task_ops};
use crate::store::sample::sample_projects;
use crate::store::{Store, StoreError};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let settings = Settings::load(cli.config.as_deref(), cli.store, cli.data_dir.as_deref())?;

    let cmd = match cli.command {
        // No subcommand → launch TUI
        None => return launch(&settings, None),
        Some(Commands::Open(args)) => return launch(&settings, Some(QueryParams::parse(&args.query))),
        Some(cmd) => cmd,
    };

    logging::init_cli(&settings.config.log.level);
    let today = Local::now().date_naive();

    match cmd {
        Commands::Open(_) => Ok(()),

        // Session (no store needed)
        Commands::Login(args) => cmd_login(&settings, &args.user),
        Commands::Logout => cmd_logout(&settings),

        // Read commands
        Commands::Route(args) => cmd_route(&*settings.open_store(today), &args.query, json),
        Commands::Projects => cmd_projects(&*settings.open_store(today), json),
        Commands::Tasks(args) => cmd_tasks(&*settings.open_store(today), &args.project, json),
        Commands::Board(args) => {
            let reference = match &args.today {
                Some(s) => parse_day(s)?,
                None => today,
            };
            cmd_board(&settings, &*settings.open_store(reference), args, reference, json)
        }

        // Write commands
        Commands::Project(cmd) => match cmd.action {
            ProjectAction::Add(args) => cmd_project_add(&mut *settings.open_store(today), args, json),
        },
        Commands::Category(cmd) => match cmd.action {
            CategoryAction::Add(args) => cmd_category_add(&mut *settings.open_store(today), args, json),
        },
        Commands::Task(cmd) => cmd_task(&mut *settings.open_store(today), cmd.action, today, json),
        Commands::Subtask(cmd) => cmd_subtask(&mut *settings.open_store(today), cmd.action, json),

        // Maintenance
        Commands::Seed(args) => {
            let reference = match &args.today {
                Some(s) => parse_day(s)?,
                None => today,
            };
            cmd_seed(&settings, reference, json)
        }
    }
}

/// Start the TUI, logging to a file since the terminal is taken
fn launch(settings: &Settings, location: Option<QueryParams>) -> CmdResult {
    let log_file = settings.log_file();
    if let Err(e) = logging::init_file(&log_file, &settings.config.log.level) {
        eprintln!("warning: logging disabled, cannot open {}: {}", log_file.display(), e);
    }
    crate::tui::run(settings, location)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

fn load_project(store: &dyn Store, id: &str) -> Result<Project, StoreError> {
    let projects = store.list_projects()?;
    find_project(&projects, id)
        .cloned()
        .ok_or_else(|| StoreError::ProjectNotFound(ProjectId::from(id)))
}

fn load_task(store: &dyn Store, project: &ProjectId, id: &str) -> Result<Task, StoreError> {
    let id = TaskId::from(id);
    store
        .get_task(project, &id)?
        .ok_or(StoreError::TaskNotFound(id))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

fn cmd_login(settings: &Settings, user: &str) -> CmdResult {
    let user = user.trim();
    if user.is_empty() {
        return Err("user name is required".into());
    }
    let (_, mut doc) = config_io::read_config(&settings.config_path)?;
    config_io::set_session_user(&mut doc, user);
    config_io::write_config(&settings.config_path, &doc)?;
    tracing::info!(user, config = %settings.config_path.display(), "signed in");
    println!("signed in as {}", user);
    Ok(())
}

fn cmd_logout(settings: &Settings) -> CmdResult {
    let (_, mut doc) = config_io::read_config(&settings.config_path)?;
    if config_io::clear_session_user(&mut doc) {
        config_io::write_config(&settings.config_path, &doc)?;
        println!("signed out");
    } else {
        println!("not signed in");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_route(store: &dyn Store, query: &str, json: bool) -> CmdResult {
    let projects = store.list_projects()?;
    let params = QueryParams::parse(query);
    let intent = route(&params, &projects);
    if json {
        print_json(&route_to_json(&intent))
    } else {
        println!("{}", intent);
        Ok(())
    }
}

fn cmd_projects(store: &dyn Store, json: bool) -> CmdResult {
    let projects = store.list_projects()?;
    if json {
        let list: Vec<ProjectJson> = projects.iter().map(project_to_json).collect();
        return print_json(&list);
    }
    if projects.is_empty() {
        println!("no projects");
    }
    for p in &projects {
        println!("{}", format_project_line(p));
    }
    Ok(())
}

fn cmd_tasks(store: &dyn Store, project_id: &str, json: bool) -> CmdResult {
    let project = load_project(store, project_id)?;
    let tasks = store.list_tasks(&project.id)?;
    if json {
        return print_json(&tasks);
    }
    println!("== {} ({}) ==", project.name, project.id);
    for t in &tasks {
        println!("{}", format_task_line(&project, t));
    }
    Ok(())
}

fn cmd_board(settings: &Settings, store: &dyn Store, args: BoardArgs, reference: NaiveDate, json: bool) -> CmdResult {
    let project = load_project(store, &args.project)?;
    let tasks = store.list_tasks(&project.id)?;
    let board = classify(&tasks, reference, settings.closed_tasks(args.include_closed));
    if json {
        let day = reference.format("%Y-%m-%d").to_string();
        return print_json(&board_to_json(&project, &day, &board));
    }
    print_lines(format_board(&project, &board));
    Ok(())
}

// ---------------------------------------------------------------------------
// Project / category
// ---------------------------------------------------------------------------

fn cmd_project_add(store: &mut dyn Store, args: ProjectAddArgs, json: bool) -> CmdResult {
    let data = ProjectForm {
        name: args.name,
        description: args.description,
    }
    .validate()?;
    let project = store.create_project(data)?;
    if json {
        return print_json(&project_to_json(&project));
    }
    println!("created project {} ({})", project.name, project.id);
    Ok(())
}

fn cmd_category_add(store: &mut dyn Store, args: CategoryAddArgs, json: bool) -> CmdResult {
    let category = CategoryForm { name: args.name }.validate()?;
    let mut project = load_project(store, &args.project)?;
    let name = category.name.clone();
    project.categories.push(category);
    store.update_project(&project)?;
    if json {
        return print_json(&project_to_json(&project));
    }
    println!("added category {} to {}", name, project.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task(store: &mut dyn Store, action: TaskAction, today: NaiveDate, json: bool) -> CmdResult {
    match action {
        TaskAction::Show(r) => {
            let project = load_project(store, &r.project)?;
            let task = load_task(store, &project.id, &r.id)?;
            if json {
                return print_json(&task);
            }
            print_lines(format_task_detail(&project, &task));
            Ok(())
        }
        TaskAction::Add(args) => {
            let priority: TaskPriority = args.priority.parse()?;
            let project = load_project(store, &args.project)?;
            let data = TaskForm {
                category: args.category,
                title: args.title,
                description: args.description,
                assignee: args.assignee,
                due_date: args.due,
                priority,
                notes: args.notes,
            }
            .validate(&project, today)?;
            let task = store.create_task(&project.id, data)?;
            if json {
                return print_json(&task);
            }
            println!("{}", task.id);
            Ok(())
        }
        TaskAction::Status(args) => {
            let status: TaskStatus = args.status.parse()?;
            edit_task(store, &args.task, json, |task| {
                task_ops::set_status(task, status);
                Ok(())
            })
        }
        TaskAction::Priority(args) => {
            let priority: TaskPriority = args.priority.parse()?;
            edit_task(store, &args.task, json, |task| {
                task_ops::set_priority(task, priority);
                Ok(())
            })
        }
        TaskAction::Comment(args) => edit_task(store, &args.task, json, |task| {
            task_ops::add_comment(task, &args.text)?;
            Ok(())
        }),
        TaskAction::Tag(args) => edit_task(store, &args.task, json, |task| {
            task_ops::add_tag(task, &args.text)?;
            Ok(())
        }),
        TaskAction::Delete(r) => {
            let project = load_project(store, &r.project)?;
            store.delete_task(&project.id, &TaskId::from(r.id.as_str()))?;
            println!("deleted {}", r.id);
            Ok(())
        }
    }
}

/// Load, modify and store one task, then print it
fn edit_task<F>(store: &mut dyn Store, r: &TaskRef, json: bool, edit: F) -> CmdResult
where
    F: FnOnce(&mut Task) -> CmdResult,
{
    let project = load_project(store, &r.project)?;
    let mut task = load_task(store, &project.id, &r.id)?;
    edit(&mut task)?;
    store.update_task(&project.id, &task)?;
    if json {
        return print_json(&task);
    }
    print_lines(format_task_detail(&project, &task));
    Ok(())
}

fn cmd_subtask(store: &mut dyn Store, action: SubtaskAction, json: bool) -> CmdResult {
    match action {
        SubtaskAction::Add(args) => {
            let title = args.title.trim().to_string();
            if title.is_empty() {
                return Err("subtask title is required".into());
            }
            edit_task(store, &args.task, json, |task| {
                progress::add_subtask(task, Subtask::new(title, args.description.trim()));
                Ok(())
            })
        }
        SubtaskAction::Toggle(args) => {
            let index = args
                .position
                .checked_sub(1)
                .ok_or("subtask positions start at 1")?;
            edit_task(store, &args.task, json, |task| {
                progress::toggle_subtask(task, index)?;
                Ok(())
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

/// Copy the demo projects into the document store. Each task goes into its
/// own document; the project documents keep only category names.
fn cmd_seed(settings: &Settings, today: NaiveDate, json: bool) -> CmdResult {
    if settings.backend != Backend::File {
        return Err("seed writes to the file store; pass --store file or set [store] backend = \"file\"".into());
    }
    let mut store = settings.open_store(today);
    let mut created = Vec::new();
    let mut task_count = 0;
    for sample in sample_projects(today) {
        let project = store.create_project(sample.without_tasks().fields)?;
        for task in sample.tasks() {
            store.create_task(&project.id, task.fields.clone())?;
            task_count += 1;
        }
        created.push(project);
    }
    tracing::info!(projects = created.len(), tasks = task_count, "seeded store");
    if json {
        let list: Vec<ProjectJson> = created.iter().map(project_to_json).collect();
        return print_json(&list);
    }
    println!("seeded {} projects, {} tasks", created.len(), task_count);
    Ok(())
}
