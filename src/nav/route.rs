use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{Project, ProjectId, TaskId, find_project};

use super::query::QueryParams;

pub const PAGE: &str = "page";
pub const PROJECT_ID: &str = "projectId";
pub const TASK_ID: &str = "taskId";

/// Values of the `page` parameter. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    ProjectDetails,
    AddProject,
    AddCategory,
    AddTask,
    TaskDetails,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::ProjectDetails => "projectDetails",
            Page::AddProject => "addProject",
            Page::AddCategory => "addCategory",
            Page::AddTask => "addTask",
            Page::TaskDetails => "taskDetails",
        }
    }
}

impl FromStr for Page {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projectDetails" => Ok(Page::ProjectDetails),
            "addProject" => Ok(Page::AddProject),
            "addCategory" => Ok(Page::AddCategory),
            "addTask" => Ok(Page::AddTask),
            "taskDetails" => Ok(Page::TaskDetails),
            _ => Err(()),
        }
    }
}

/// Which screen to present, with the project it was resolved against.
/// The task in `ShowTaskDetails` stays an identifier: loading it is up to
/// the caller's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent<'a> {
    ShowProjectList,
    ShowProjectDetails(&'a Project),
    ShowAddProjectForm,
    ShowAddCategoryForm(&'a Project),
    ShowAddTaskForm(&'a Project),
    ShowTaskDetails(&'a Project, TaskId),
}

impl<'a> ViewIntent<'a> {
    pub fn page(&self) -> Option<Page> {
        match self {
            ViewIntent::ShowProjectList => None,
            ViewIntent::ShowProjectDetails(_) => Some(Page::ProjectDetails),
            ViewIntent::ShowAddProjectForm => Some(Page::AddProject),
            ViewIntent::ShowAddCategoryForm(_) => Some(Page::AddCategory),
            ViewIntent::ShowAddTaskForm(_) => Some(Page::AddTask),
            ViewIntent::ShowTaskDetails(..) => Some(Page::TaskDetails),
        }
    }

    pub fn project(&self) -> Option<&'a Project> {
        match self {
            ViewIntent::ShowProjectDetails(p)
            | ViewIntent::ShowAddCategoryForm(p)
            | ViewIntent::ShowAddTaskForm(p)
            | ViewIntent::ShowTaskDetails(p, _) => Some(*p),
            ViewIntent::ShowProjectList | ViewIntent::ShowAddProjectForm => None,
        }
    }

    /// The same view addressed by identifiers only
    pub fn destination(&self) -> Destination {
        match self {
            ViewIntent::ShowProjectList => Destination::ProjectList,
            ViewIntent::ShowProjectDetails(p) => Destination::ProjectDetails(p.id.clone()),
            ViewIntent::ShowAddProjectForm => Destination::AddProject,
            ViewIntent::ShowAddCategoryForm(p) => Destination::AddCategory(p.id.clone()),
            ViewIntent::ShowAddTaskForm(p) => Destination::AddTask(p.id.clone()),
            ViewIntent::ShowTaskDetails(p, t) => Destination::TaskDetails(p.id.clone(), t.clone()),
        }
    }
}

impl fmt::Display for ViewIntent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewIntent::ShowProjectList => write!(f, "project list"),
            ViewIntent::ShowProjectDetails(p) => write!(f, "project details: {} ({})", p.name, p.id),
            ViewIntent::ShowAddProjectForm => write!(f, "add project form"),
            ViewIntent::ShowAddCategoryForm(p) => {
                write!(f, "add category form: {} ({})", p.name, p.id)
            }
            ViewIntent::ShowAddTaskForm(p) => write!(f, "add task form: {} ({})", p.name, p.id),
            ViewIntent::ShowTaskDetails(p, t) => {
                write!(f, "task details: task {} in {} ({})", t, p.name, p.id)
            }
        }
    }
}

/// A view addressed by identifiers, used to navigate before anything is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    ProjectList,
    ProjectDetails(ProjectId),
    AddProject,
    AddCategory(ProjectId),
    AddTask(ProjectId),
    TaskDetails(ProjectId, TaskId),
}

impl Destination {
    /// Location updates that address this view. Every navigation key is
    /// written so no stale identifier survives a transition.
    pub fn location_updates(&self) -> Vec<(&'static str, Option<String>)> {
        let (page, project, task): (Option<Page>, Option<&ProjectId>, Option<&TaskId>) = match self {
            Destination::ProjectList => (None, None, None),
            Destination::ProjectDetails(p) => (Some(Page::ProjectDetails), Some(p), None),
            Destination::AddProject => (Some(Page::AddProject), None, None),
            Destination::AddCategory(p) => (Some(Page::AddCategory), Some(p), None),
            Destination::AddTask(p) => (Some(Page::AddTask), Some(p), None),
            Destination::TaskDetails(p, t) => (Some(Page::TaskDetails), Some(p), Some(t)),
        };
        vec![
            (PAGE, page.map(|p| p.as_str().to_string())),
            (PROJECT_ID, project.map(|p| p.to_string())),
            (TASK_ID, task.map(|t| t.to_string())),
        ]
    }

    /// The query parameters of this view on their own
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.apply(self.location_updates());
        params
    }
}

/// Map query parameters to a view. An identifier that resolves to no project
/// falls back to the project list; it is never an error.
pub fn route<'a>(params: &QueryParams, projects: &'a [Project]) -> ViewIntent<'a> {
    let page = params.get(PAGE).and_then(|p| p.parse::<Page>().ok());
    let project_id = params.get_non_empty(PROJECT_ID);
    let task_id = params.get_non_empty(TASK_ID);

    let resolved = match (page, project_id, task_id) {
        (Some(Page::ProjectDetails), Some(pid), _) => {
            find_project(projects, pid).map(ViewIntent::ShowProjectDetails)
        }
        (Some(Page::AddProject), _, _) => Some(ViewIntent::ShowAddProjectForm),
        (Some(Page::AddCategory), Some(pid), _) => {
            find_project(projects, pid).map(ViewIntent::ShowAddCategoryForm)
        }
        (Some(Page::AddTask), Some(pid), _) => {
            find_project(projects, pid).map(ViewIntent::ShowAddTaskForm)
        }
        (Some(Page::TaskDetails), Some(pid), Some(tid)) => {
            find_project(projects, pid).map(|p| ViewIntent::ShowTaskDetails(p, TaskId::from(tid)))
        }
        _ => None,
    };

    resolved.unwrap_or_else(|| {
        if page.is_some() {
            tracing::debug!(location = %params, "location did not resolve, showing project list");
        }
        ViewIntent::ShowProjectList
    })
}
