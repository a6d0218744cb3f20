//! Footer: optional keybinding help plus scroll position

use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

pub const HELP_TEXT: &str =
    "j/k: scroll • g/G: top/bottom • C-d/C-u: page down/up • r: refresh • ?: help • q: quit";

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let muted = Style::default().fg(theme.palette.fg_muted);
    let percent = Paragraph::new(Line::from(scroll_label(state.scroll_percent())))
        .style(muted.add_modifier(Modifier::BOLD))
        .alignment(ratatui::layout::Alignment::Right);

    if !state.show_help_footer {
        frame.render_widget(percent, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);
    frame.render_widget(Paragraph::new(HELP_TEXT).style(muted), cols[0]);
    frame.render_widget(percent, cols[1]);
}

fn scroll_label(ratio: f64) -> String {
    format!("{:3}%", (ratio * 100.0) as u32)
}
