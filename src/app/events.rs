use super::coordinator::FetchResult;
use crate::player::{PollError, TrackDescriptor};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Poll timer fired.
    Tick,
    /// Poll outcome, numbered in issue order.
    Poll(u64, Result<TrackDescriptor, PollError>),
    Lyrics(FetchResult),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}
