pub mod board;
pub mod form;
pub mod header;
pub mod helpers;
pub mod project_list;
pub mod status_row;
pub mod task_details;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Screen};

/// Main render function: header, current screen, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + location
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match &app.screen {
        Screen::ProjectList { .. } => project_list::render_project_list(frame, app, chunks[1]),
        Screen::Board { .. } => board::render_board(frame, app, chunks[1]),
        Screen::AddProject { .. }
        | Screen::AddCategory { .. }
        | Screen::AddTask { .. }
        | Screen::Login { .. } => form::render_form(frame, app, chunks[1]),
        Screen::TaskDetails { .. } => task_details::render_task_details(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
