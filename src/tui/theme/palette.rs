//! Color palette

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub status_fg: Color,
    pub status_bg: Color,
    pub fg_primary: Color,
    pub fg_muted: Color,
    pub error: Color,
}

impl Palette {
    pub const DEFAULT: Self = Self {
        status_fg: Color::Rgb(255, 255, 255), // #ffffff
        status_bg: Color::Rgb(0, 136, 204),   // #0088cc
        fg_primary: Color::Reset,
        fg_muted: Color::Rgb(98, 98, 98), // #626262
        error: Color::Rgb(224, 108, 117),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
