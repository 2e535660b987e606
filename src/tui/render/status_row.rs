use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};
use crate::util::unicode;

/// Key hints for the current screen
pub fn key_hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::ProjectList { .. } => "j/k move  Enter open  a add project  [ ] back/fwd  q quit",
        Screen::Board { .. } => {
            "j/k move  Enter open  a add task  c add category  Esc projects  r refresh"
        }
        Screen::AddProject { .. } | Screen::AddCategory { .. } | Screen::AddTask { .. } => {
            "Tab next field  Enter save  Esc cancel"
        }
        Screen::TaskDetails {
            new_subtask: Some(_),
            ..
        } => "Enter add subtask  Esc cancel",
        Screen::TaskDetails { .. } => {
            "Space toggle  a add subtask  s status  p priority  Esc board"
        }
        Screen::Login { .. } => "Enter sign in  Esc quit",
    }
}

/// Render the status row (bottom of screen): the pending notice, else key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(notice, width.saturating_sub(1))),
            Style::default().fg(app.theme.red).bg(bg),
        ))
    } else if app.settings.config.ui.show_key_hints {
        let hint = key_hints(&app.screen);
        let hint = unicode::truncate_to_width(hint, width.saturating_sub(1));
        let padding = width.saturating_sub(unicode::display_width(&hint) + 1);
        Line::from(vec![
            Span::styled(" ".repeat(padding), Style::default().bg(bg)),
            Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)),
        ])
    } else {
        Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::FAILURE_NOTICE;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn hints_are_right_aligned() {
        let app = test_app();
        let output = draw(&app);
        assert!(output.starts_with(' '));
        assert!(output.ends_with("q quit"));
    }

    #[test]
    fn notice_replaces_hints() {
        let mut app = test_app();
        app.notice = Some(FAILURE_NOTICE.to_string());
        assert_eq!(draw(&app), format!(" {}", FAILURE_NOTICE));
    }

    #[test]
    fn hints_can_be_turned_off() {
        let mut app = test_app();
        app.settings.config.ui.show_key_hints = false;
        assert_eq!(draw(&app), "");
    }
}
