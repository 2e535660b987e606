use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::model::{TaskPriority, TaskStatus};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Background and base style for a list row, highlighted under the cursor
pub(super) fn row_style(theme: &Theme, is_cursor: bool) -> Style {
    if is_cursor {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(theme.background)
    }
}

/// Cursor marker column
pub(super) fn cursor_mark(theme: &Theme, is_cursor: bool) -> Span<'static> {
    if is_cursor {
        Span::styled(
            "\u{258E}",
            Style::default()
                .fg(theme.selection_border)
                .bg(theme.selection_bg),
        )
    } else {
        Span::styled(" ", Style::default().bg(theme.background))
    }
}

pub(super) fn status_span(theme: &Theme, status: TaskStatus, bg: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        unicode::fit_to_width(status.label(), 13),
        Style::default().fg(theme.status_color(status)).bg(bg),
    )
}

pub(super) fn priority_span(theme: &Theme, priority: TaskPriority, bg: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        unicode::fit_to_width(priority.label(), 6),
        Style::default().fg(theme.priority_color(priority)).bg(bg),
    )
}

/// Ten-cell progress bar, e.g. `███░░░░░░░ 30%`
pub(super) fn progress_bar(progress: u8) -> String {
    let filled = (progress.min(100) as usize + 5) / 10;
    format!(
        "{}{} {}%",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(10 - filled),
        progress
    )
}
