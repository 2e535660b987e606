use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::model::{Project, Task};
use crate::ops::task_ops;
use crate::tui::app::{App, Screen};

use super::helpers::{cursor_mark, priority_span, progress_bar, row_style, status_span};

/// Every stored field of one task, its subtasks as a checklist, and its comments
pub fn render_task_details(frame: &mut Frame, app: &App, area: Rect) {
    let Screen::TaskDetails {
        project,
        task_id,
        task,
        cursor,
        new_subtask,
    } = &app.screen
    else {
        return;
    };
    let bg = app.theme.background;

    let Some(task) = task else {
        let lines = vec![
            Line::from(Span::styled(
                format!(" Task {} was not found in {}", task_id, project.name),
                Style::default().fg(app.theme.red).bg(bg),
            )),
            Line::from(Span::styled(
                " It may have been deleted. Press Esc to return to the board.",
                Style::default().fg(app.theme.dim).bg(bg),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    };

    let mut lines = header_lines(app, project, task);

    lines.push(Line::from(""));
    lines.push(section_heading(app, &format!("Subtasks ({})", task.subtasks.len())));
    if task.subtasks.is_empty() && new_subtask.is_none() {
        lines.push(dim_line(app, "  None"));
    }
    for (i, subtask) in task.subtasks.iter().enumerate() {
        let is_cursor = i == *cursor && new_subtask.is_none();
        let style = row_style(&app.theme, is_cursor);
        let check = if subtask.completed { "[x]" } else { "[ ]" };
        let check_color = if subtask.completed {
            app.theme.green
        } else {
            app.theme.text
        };
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let mut spans = vec![
            cursor_mark(&app.theme, is_cursor),
            Span::styled(" ", style),
            Span::styled(check, Style::default().fg(check_color).bg(row_bg)),
            Span::styled(format!(" {}", subtask.title), style),
        ];
        if !subtask.description.is_empty() {
            spans.push(Span::styled(
                format!("  {}", subtask.description),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }
    if let Some(text) = new_subtask {
        lines.push(Line::from(vec![
            Span::styled("  [ ] ", Style::default().fg(app.theme.text).bg(bg)),
            Span::styled(
                text.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_heading(app, &format!("Comments ({})", task.comments.len())));
    if task.comments.is_empty() {
        lines.push(dim_line(app, "  None"));
    }
    for comment in &task.comments {
        lines.push(Line::from(Span::styled(
            format!("  \u{2022} {}", comment),
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }

    if !task.attachments.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_heading(app, "Attachments"));
        for attachment in &task.attachments {
            lines.push(Line::from(Span::styled(
                format!("  {}", attachment),
                Style::default().fg(app.theme.blue).bg(bg),
            )));
        }
    }

    if !task.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_heading(app, "Notes"));
        lines.push(Line::from(Span::styled(
            format!("  {}", task.notes),
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }

    // Scroll so the subtask cursor stays visible
    let height = area.height as usize;
    let subtask_line = header_len(task) + 2 + *cursor;
    let scroll = (subtask_line + 1).saturating_sub(height);

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Lines produced by `header_lines` for this task
fn header_len(task: &Task) -> usize {
    let mut n = 5;
    if !task.description.is_empty() {
        n += 1;
    }
    if !task.tags.is_empty() {
        n += 1;
    }
    n
}

fn header_lines<'a>(app: &'a App, project: &Project, task: &Task) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let label = |s: &str| Span::styled(format!(" {:<10}", s), Style::default().fg(app.theme.dim).bg(bg));
    let value = |s: String| Span::styled(s, Style::default().fg(app.theme.text).bg(bg));
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {}", task.title),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  #{}", task.id), Style::default().fg(app.theme.dim).bg(bg)),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::from(value(format!(" {}", task.description))));
    }
    lines.push(Line::from(vec![
        label("Status"),
        status_span(&app.theme, task.status, bg),
        label("Priority"),
        priority_span(&app.theme, task.priority, bg),
    ]));
    lines.push(Line::from(vec![
        label("Category"),
        Span::styled(
            task_ops::category_label(project, &task.category).to_string(),
            Style::default().fg(app.theme.cyan).bg(bg),
        ),
        Span::styled("  ", Style::default().bg(bg)),
        label("Assignee"),
        value(or_dash(&task.assignee)),
    ]));
    lines.push(Line::from(vec![
        label("Due"),
        value(or_dash(&task.due_date)),
        Span::styled("  ", Style::default().bg(bg)),
        label("Created"),
        value(or_dash(&task.created_at)),
    ]));
    lines.push(Line::from(vec![
        label("Progress"),
        Span::styled(
            progress_bar(task.progress),
            Style::default().fg(app.theme.green).bg(bg),
        ),
    ]));
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(vec![
            label("Tags"),
            Span::styled(tags.join(" "), Style::default().fg(app.theme.purple).bg(bg)),
        ]));
    }
    lines
}

fn section_heading<'a>(app: &App, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default()
            .fg(app.theme.text)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD),
    ))
}

fn dim_line<'a>(app: &App, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ))
}
