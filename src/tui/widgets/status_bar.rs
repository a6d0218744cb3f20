use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let style = Style::default()
        .fg(theme.palette.status_fg)
        .bg(theme.palette.status_bg)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![Span::raw(" "), Span::raw(state.status_line())]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}
