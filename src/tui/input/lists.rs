use crossterm::event::{KeyCode, KeyEvent};

use crate::nav::Destination;
use crate::tui::app::{App, Screen};

use super::step;

pub(super) fn handle_project_list(app: &mut App, key: KeyEvent) {
    let len = app.projects.len();
    let Screen::ProjectList { cursor } = &mut app.screen else {
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step(cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => step(cursor, len, false),
        KeyCode::Char('g') | KeyCode::Home => *cursor = 0,
        KeyCode::Char('G') | KeyCode::End => *cursor = len.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(project) = app.projects.get(*cursor) {
                let id = project.id.clone();
                app.navigate(Destination::ProjectDetails(id));
            }
        }
        KeyCode::Char('a') => app.navigate(Destination::AddProject),
        KeyCode::Char('r') => app.handle_navigation(),
        _ => {}
    }
}

pub(super) fn handle_board(app: &mut App, key: KeyEvent) {
    let len = app.board_len();
    let selection = app.board_selection();
    let Screen::Board {
        project, cursor, ..
    } = &mut app.screen
    else {
        return;
    };
    let project_id = project.id.clone();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step(cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => step(cursor, len, false),
        KeyCode::Char('g') | KeyCode::Home => *cursor = 0,
        KeyCode::Char('G') | KeyCode::End => *cursor = len.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(task_id) = selection {
                app.navigate(Destination::TaskDetails(project_id, task_id));
            }
        }
        KeyCode::Char('a') => app.navigate(Destination::AddTask(project_id)),
        KeyCode::Char('c') => app.navigate(Destination::AddCategory(project_id)),
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => app.navigate(Destination::ProjectList),
        KeyCode::Char('r') => app.handle_navigation(),
        _ => {}
    }
}
