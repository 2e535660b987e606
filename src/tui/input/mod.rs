mod details;
mod forms;
mod lists;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Screen};

use details::*;
use forms::*;
use lists::*;

/// Handle a key event on the current screen
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Text entry owns every other key
    if app.screen.is_typing() {
        match &app.screen {
            Screen::TaskDetails { .. } => handle_subtask_input(app, key),
            Screen::Login { .. } => handle_login(app, key),
            _ => handle_form(app, key),
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Backspace | KeyCode::Char('[') => {
            app.go_back();
            return;
        }
        KeyCode::Char(']') => {
            app.go_forward();
            return;
        }
        _ => {}
    }

    match &app.screen {
        Screen::ProjectList { .. } => handle_project_list(app, key),
        Screen::Board { .. } => handle_board(app, key),
        Screen::TaskDetails { .. } => handle_task_details(app, key),
        Screen::AddProject { .. }
        | Screen::AddCategory { .. }
        | Screen::AddTask { .. }
        | Screen::Login { .. } => {}
    }
}

/// Move a list cursor by one within `len` entries
fn step(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
    } else if down {
        *cursor = (*cursor + 1).min(len - 1);
    } else {
        *cursor = cursor.saturating_sub(1);
    }
}
