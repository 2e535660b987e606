use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, Screen};
use crate::tui::form::Form;
use crate::util::unicode;

/// Width of the label column
const LABEL_W: usize = 14;

/// Any of the input screens: add project, category or task, and sign-in
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let (title, form, help) = match &app.screen {
        Screen::AddProject { form } => ("New project".to_string(), form, None),
        Screen::AddCategory { project, form } => {
            (format!("New category in {}", project.name), form, None)
        }
        Screen::AddTask { project, form } => {
            let names: Vec<&str> = project.categories.iter().map(|c| c.name.as_str()).collect();
            let help = if names.is_empty() {
                "This project has no categories yet. Press Esc and add one first.".to_string()
            } else {
                format!("Categories: {}", names.join(", "))
            };
            (format!("New task in {}", project.name), form, Some(help))
        }
        Screen::Login { form } => (
            "Sign in".to_string(),
            form,
            Some("Nobody is signed in. Enter a user name to continue.".to_string()),
        ),
        _ => return,
    };

    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    if let Some(help) = help {
        lines.push(Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(&help, width.saturating_sub(1))),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    lines.push(Line::from(""));

    lines.extend(field_lines(app, form, width));

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn field_lines<'a>(app: &'a App, form: &Form, width: usize) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let value_w = width.saturating_sub(LABEL_W + 4);
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let label_style = if focused {
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            // Long values keep their tail visible while typing
            let shown = tail_to_width(&field.value, value_w.saturating_sub(1));
            let mut spans = vec![
                Span::styled(
                    format!(" {} ", unicode::fit_to_width(field.label, LABEL_W)),
                    label_style,
                ),
                Span::styled(
                    shown,
                    Style::default().fg(app.theme.text_bright).bg(if focused {
                        app.theme.selection_bg
                    } else {
                        bg
                    }),
                ),
            ];
            if focused {
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(bg),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

/// The last `cells` cells of `s`
fn tail_to_width(s: &str, cells: usize) -> String {
    let mut width = 0;
    let mut start = s.len();
    for (idx, g) in s.grapheme_indices(true).rev() {
        let w = unicode::display_width(g);
        if width + w > cells {
            break;
        }
        width += w;
        start = idx;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form(frame, app, area);
        })
    }

    #[test]
    fn task_form_is_prefilled() {
        let app = test_app_at("?page=addTask&projectId=1");
        let output = draw(&app);
        assert!(output.contains("New task in Project A"));
        assert!(output.contains("Categories: Category 1, Category 2"));
        let category = output.lines().find(|l| l.starts_with(" Category ")).unwrap();
        assert!(category.contains("Category 1"));
        let priority = output.lines().find(|l| l.contains("Priority")).unwrap();
        assert!(priority.contains("Medium"));
        // Focus starts on the first field
        assert!(category.contains('\u{258C}'));
    }

    #[test]
    fn task_form_without_categories_says_so() {
        let app = test_app_at("?page=addTask&projectId=3");
        let output = draw(&app);
        assert!(output.contains("no categories yet"));
    }

    #[test]
    fn validation_error_is_shown() {
        let mut app = test_app_at("?page=addProject");
        app.submit_project();
        let output = draw(&app);
        assert!(output.contains("project name is required"));
    }

    #[test]
    fn tail_keeps_end_of_long_values() {
        assert_eq!(tail_to_width("abcdef", 3), "def");
        assert_eq!(tail_to_width("ab", 3), "ab");
        assert_eq!(tail_to_width("日本語", 4), "本語");
    }
}
