use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::nav::Destination;
use crate::tui::app::{App, Screen};
use crate::util::unicode::pop_grapheme;

use super::step;

pub(super) fn handle_task_details(app: &mut App, key: KeyEvent) {
    let Screen::TaskDetails {
        project,
        task,
        cursor,
        new_subtask,
        ..
    } = &mut app.screen
    else {
        return;
    };
    let len = task.as_ref().map_or(0, |t| t.subtasks.len());
    let project_id = project.id.clone();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step(cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => step(cursor, len, false),
        KeyCode::Char('a') if task.is_some() => *new_subtask = Some(String::new()),
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => app.toggle_selected_subtask(),
        KeyCode::Char('s') => app.cycle_status(),
        KeyCode::Char('p') => app.cycle_priority(),
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
            app.navigate(Destination::ProjectDetails(project_id))
        }
        _ => {}
    }
}

/// Typing the title of a new subtask
pub(super) fn handle_subtask_input(app: &mut App, key: KeyEvent) {
    let Screen::TaskDetails {
        new_subtask: Some(text),
        ..
    } = &mut app.screen
    else {
        return;
    };
    match key.code {
        KeyCode::Enter => app.commit_new_subtask(),
        KeyCode::Esc => {
            if let Screen::TaskDetails { new_subtask, .. } = &mut app.screen {
                *new_subtask = None;
            }
        }
        KeyCode::Backspace => pop_grapheme(text),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
        _ => {}
    }
}
