use super::coordinator::Display;
use crate::player::TrackDescriptor;

const LOADING: &str = "Loading...";

/// View state read by the widgets. Written only by the event loop.
#[derive(Debug, Clone)]
pub struct AppState {
    pub track: Option<TrackDescriptor>,
    pub display: Display,
    /// First visible content line.
    pub scroll: usize,
    /// Rows available to the lyrics viewport, recorded at draw time.
    pub viewport_height: usize,
    /// Rows the content occupies once wrapped to the viewport width.
    pub content_rows: usize,
    pub show_help_footer: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(show_help_footer: bool) -> Self {
        Self {
            track: None,
            display: Display::Loading,
            scroll: 0,
            viewport_height: 0,
            content_rows: 1,
            show_help_footer,
            should_quit: false,
        }
    }

    pub fn status_line(&self) -> String {
        match &self.track {
            None => LOADING.to_string(),
            Some(t) => match &t.album {
                Some(album) => format!("{} - {} - {}", t.artist, album, t.title),
                None => format!("{} - {}", t.artist, t.title),
            },
        }
    }

    pub fn content(&self) -> &str {
        match &self.display {
            Display::Loading => LOADING,
            Display::Idle(msg) | Display::Lyrics(msg) | Display::Error(msg) => msg.as_str(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.content().lines().count().max(1)
    }

    /// Replace what the viewport shows. New content always starts at the top.
    pub fn show(&mut self, display: Display) {
        if self.display != display {
            self.display = display;
            self.scroll = 0;
            // Unwrapped until the next draw measures it.
            self.content_rows = self.line_count();
        }
    }

    /// Record the viewport geometry measured while rendering.
    pub fn set_viewport(&mut self, height: usize, content_rows: usize) {
        self.viewport_height = height;
        self.content_rows = content_rows.max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.content_rows.saturating_sub(self.viewport_height)
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_add(n).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn go_top(&mut self) {
        self.scroll = 0;
    }

    pub fn go_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn half_page(&self) -> usize {
        (self.viewport_height / 2).max(1)
    }

    /// 0.0..=1.0; content that fits counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_scroll();
        if max == 0 {
            return 1.0;
        }
        (self.scroll as f64 / max as f64).clamp(0.0, 1.0)
    }
}
