//! Theme configuration

pub mod palette;

pub use palette::Palette;

#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub palette: Palette,
}

pub fn get_theme() -> Theme {
    Theme::default()
}
