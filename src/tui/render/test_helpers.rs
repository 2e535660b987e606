use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::settings::Settings;
use crate::model::{AppConfig, Backend};
use crate::nav::QueryParams;
use crate::store::{MemoryStore, Session};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Reference day of the demo data in tests
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn settings(user: Option<&str>, dir: &Path) -> Settings {
    let mut config = AppConfig::default();
    config.session.user = user.map(str::to_string);
    Settings {
        config,
        config_path: dir.join("taskboard.toml"),
        data_dir: dir.to_path_buf(),
        backend: Backend::Memory,
    }
}

/// Signed in as "ana" over the demo data, at the project list
pub fn test_app() -> App {
    test_app_at("")
}

/// Signed in as "ana" over the demo data, starting at `query`
pub fn test_app_at(query: &str) -> App {
    let dir = PathBuf::from("/tmp/taskboard-test");
    let store = MemoryStore::with_sample_data(Session::signed_in("ana"), today());
    App::new(
        settings(Some("ana"), &dir),
        Box::new(store),
        today(),
        QueryParams::parse(query),
    )
}

/// Nobody signed in. The config file and UI state live in `dir`.
pub fn signed_out_app(dir: &Path, query: &str) -> App {
    let store = MemoryStore::with_sample_data(Session::anonymous(), today());
    App::new(
        settings(None, dir),
        Box::new(store),
        today(),
        QueryParams::parse(query),
    )
}
