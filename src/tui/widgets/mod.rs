pub mod footer;
pub mod lyrics_view;
pub mod root;
pub mod status_bar;
