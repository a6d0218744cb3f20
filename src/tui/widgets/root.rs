//! Root layout widget

use crate::app::state::AppState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::{footer, lyrics_view, status_bar};

/// ┌──────────────────────────────┐
/// │ artist - album - title       │  status bar
/// ├──────────────────────────────┤
/// │           lyrics             │
/// │        (scrollable)          │
/// ├──────────────────────────────┤
/// │ help                    42%  │  footer
/// └──────────────────────────────┘
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(1),    // Lyrics viewport
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    status_bar::render(frame, state, rows[0]);
    lyrics_view::render(frame, state, rows[1]);
    footer::render(frame, state, rows[2]);
}
