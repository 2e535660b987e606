use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::TaskSummary;
use crate::ops::classify::{BoardEntry, Bucket};
use crate::ops::task_ops;
use crate::tui::app::{App, Screen};
use crate::util::unicode;

use super::helpers::{cursor_mark, priority_span, row_style, status_span};

/// Heading of the section for tasks without a usable due date
pub const UNSCHEDULED_HEADING: &str = "No usable due date";

/// A project's tasks grouped by due-date bucket relative to `app.today`
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let Screen::Board {
        project,
        tasks,
        cursor,
    } = &app.screen
    else {
        return;
    };
    let bg = app.theme.background;
    let width = area.width as usize;
    let board = app.board(tasks);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {}", project.name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.today.format("%Y-%m-%d")),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]));

    let mut sections: Vec<(&str, &[BoardEntry<'_, TaskSummary>])> = Bucket::ALL
        .iter()
        .map(|b| (b.heading(), board.bucket(*b)))
        .collect();
    if !board.unscheduled.is_empty() {
        sections.push((UNSCHEDULED_HEADING, board.unscheduled.as_slice()));
    }

    let mut flat_idx = 0usize;
    for (heading, entries) in sections {
        lines.push(Line::from(Span::styled(
            format!(" {} ({})", heading, entries.len()),
            Style::default()
                .fg(app.theme.text)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in entries {
            lines.push(task_line(app, project, entry.task, flat_idx == *cursor, width));
            flat_idx += 1;
        }
    }

    if board.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " No tasks on the board",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    // Keep the cursor row on screen
    let height = area.height as usize;
    let cursor_line = cursor_line_index(&lines, app);
    let scroll = cursor_line.map_or(0, |l| (l + 1).saturating_sub(height));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn cursor_line_index(lines: &[Line], app: &App) -> Option<usize> {
    lines.iter().position(|l| {
        l.spans
            .first()
            .is_some_and(|s| s.style.bg == Some(app.theme.selection_bg))
    })
}

fn task_line<'a>(
    app: &'a App,
    project: &crate::model::Project,
    task: &TaskSummary,
    is_cursor: bool,
    width: usize,
) -> Line<'a> {
    let style = row_style(&app.theme, is_cursor);
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let category = task_ops::category_label(project, &task.category).to_string();
    let due = if task.due_date.is_empty() {
        "-".to_string()
    } else {
        task.due_date.clone()
    };
    // marker(1) + status(13) + space + priority(6) + space + due(10) + spaces(2) + category
    let fixed = 1 + 13 + 1 + 6 + 1 + 10 + 2 + unicode::display_width(&category) + 2;
    let title_w = width.saturating_sub(fixed + 2).max(8);
    Line::from(vec![
        cursor_mark(&app.theme, is_cursor),
        Span::styled(" ", style),
        Span::styled(unicode::fit_to_width(&task.title, title_w), style),
        Span::styled(" ", style),
        status_span(&app.theme, task.status, row_bg),
        Span::styled(" ", style),
        priority_span(&app.theme, task.priority, row_bg),
        Span::styled(" ", style),
        Span::styled(
            unicode::fit_to_width(&due, 10),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
        Span::styled("  ", style),
        Span::styled(category, Style::default().fg(app.theme.cyan).bg(row_bg)),
    ])
}
