use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::nav::Destination;
use crate::tui::app::{App, Screen};
use crate::tui::form::Form;

fn form_mut(screen: &mut Screen) -> Option<&mut Form> {
    match screen {
        Screen::AddProject { form }
        | Screen::AddCategory { form, .. }
        | Screen::AddTask { form, .. }
        | Screen::Login { form } => Some(form),
        _ => None,
    }
}

/// Shared text editing. Returns true if the key was consumed.
fn edit_form(form: &mut Form, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.insert_char(c),
        _ => return false,
    }
    true
}

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    if let Some(form) = form_mut(&mut app.screen)
        && edit_form(form, key)
    {
        return;
    }
    match key.code {
        KeyCode::Enter => match app.screen {
            Screen::AddProject { .. } => app.submit_project(),
            Screen::AddCategory { .. } => app.submit_category(),
            Screen::AddTask { .. } => app.submit_task(),
            _ => {}
        },
        KeyCode::Esc => {
            let back = match app.project_id() {
                Some(id) => Destination::ProjectDetails(id.clone()),
                None => Destination::ProjectList,
            };
            app.navigate(back);
        }
        _ => {}
    }
}

pub(super) fn handle_login(app: &mut App, key: KeyEvent) {
    if let Some(form) = form_mut(&mut app.screen)
        && edit_form(form, key)
    {
        return;
    }
    match key.code {
        KeyCode::Enter => app.submit_login(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}
