#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    LineDown,
    LineUp,
    GoTop,
    GoBottom,
    HalfPageDown,
    HalfPageUp,

    Refresh,
    ToggleHelp,

    Resize,
}
