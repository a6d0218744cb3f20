//! Lyrics viewport - centered, wrapped, vertically scrollable

use crate::app::coordinator::Display;
use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();

    let color = match state.display {
        Display::Error(_) => theme.palette.error,
        Display::Lyrics(_) => theme.palette.fg_primary,
        Display::Loading | Display::Idle(_) => theme.palette.fg_muted,
    };

    let lines: Vec<Line> = state
        .content()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    // Scroll is counted in wrapped rows, so measure before clamping it.
    let rows = paragraph.line_count(area.width);
    state.set_viewport(area.height as usize, rows);

    let offset = u16::try_from(state.scroll).unwrap_or(u16::MAX);
    frame.render_widget(paragraph.scroll((offset, 0)), area);
}
