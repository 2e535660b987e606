use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};
use crate::util::unicode;

use super::helpers::spans_width;

/// Title row with breadcrumb and signed-in user, then the location under a rule
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(
            " taskboard ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            format!(" {}", breadcrumb(&app.screen)),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ];

    if let Some(user) = app.settings.config.session.user.as_deref() {
        let label = format!("{} ", user);
        let used = spans_width(&spans);
        let label_w = unicode::display_width(&label);
        if used + label_w < width {
            spans.push(Span::styled(
                " ".repeat(width - used - label_w),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(label, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    // Location rule: ──── ?page=... ────
    let location = app.location().to_string();
    let mut rule = String::from("\u{2500}\u{2500} ");
    if !location.is_empty() {
        rule.push_str(&location);
        rule.push(' ');
    }
    let rule = unicode::truncate_to_width(&rule, width);
    let fill = width.saturating_sub(unicode::display_width(&rule));
    let line = Line::from(vec![
        Span::styled(rule, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled("\u{2500}".repeat(fill), Style::default().fg(app.theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line), chunks[1]);
}

fn breadcrumb(screen: &Screen) -> String {
    match screen {
        Screen::ProjectList { .. } => "Projects".to_string(),
        Screen::Board { project, .. } => format!("Projects \u{203A} {}", project.name),
        Screen::AddProject { .. } => "Projects \u{203A} New project".to_string(),
        Screen::AddCategory { project, .. } => {
            format!("Projects \u{203A} {} \u{203A} New category", project.name)
        }
        Screen::AddTask { project, .. } => {
            format!("Projects \u{203A} {} \u{203A} New task", project.name)
        }
        Screen::TaskDetails { project, task, task_id, .. } => {
            let title = task.as_ref().map_or(task_id.as_str(), |t| t.title.as_str());
            format!("Projects \u{203A} {} \u{203A} {}", project.name, title)
        }
        Screen::Login { .. } => "Sign in".to_string(),
    }
}
