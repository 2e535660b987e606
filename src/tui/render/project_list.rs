use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};
use crate::util::unicode;

use super::helpers::{cursor_mark, row_style};

/// Every project with its category and task counts
pub fn render_project_list(frame: &mut Frame, app: &App, area: Rect) {
    let cursor = match &app.screen {
        Screen::ProjectList { cursor } => *cursor,
        _ => 0,
    };
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        " Projects",
        Style::default()
            .fg(app.theme.text)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));

    if app.projects.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No projects yet",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    for (i, project) in app.projects.iter().enumerate() {
        let is_cursor = i == cursor;
        let style = row_style(&app.theme, is_cursor);
        let counts = format!(
            "{} categories  {} tasks ",
            project.categories.len(),
            project.tasks().count()
        );
        let counts_w = unicode::display_width(&counts);
        // marker + space + name column
        let name_w = width.saturating_sub(counts_w + 2);
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        lines.push(Line::from(vec![
            cursor_mark(&app.theme, is_cursor),
            Span::styled(" ", style),
            Span::styled(unicode::fit_to_width(&project.name, name_w), style),
            Span::styled(counts, Style::default().fg(app.theme.dim).bg(row_bg)),
        ]));
        if !project.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(
                    "    {}",
                    unicode::truncate_to_width(&project.description, width.saturating_sub(4))
                ),
                Style::default().fg(app.theme.dim).bg(bg),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn lists_projects_with_counts() {
        let app = test_app();
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_project_list(frame, &app, area);
        });
        let a = output.lines().find(|l| l.contains("Project A")).unwrap();
        assert!(a.contains("2 categories  3 tasks"));
        let c = output.lines().find(|l| l.contains("Project C")).unwrap();
        assert!(c.contains("0 categories  0 tasks"));
        assert!(output.contains("Description of Project B"));
    }

    #[test]
    fn cursor_row_is_marked() {
        let mut app = test_app();
        app.screen = Screen::ProjectList { cursor: 1 };
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_project_list(frame, &app, area);
        });
        let b = output.lines().find(|l| l.contains("Project B")).unwrap();
        assert!(b.starts_with('\u{258E}'));
        let a = output.lines().find(|l| l.contains("Project A")).unwrap();
        assert!(!a.starts_with('\u{258E}'));
    }

    #[test]
    fn empty_collection() {
        let mut app = test_app();
        app.projects.clear();
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_project_list(frame, &app, area);
        });
        assert!(output.contains("No projects yet"));
    }
}
