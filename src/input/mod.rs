use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) => InputEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    Ok(_) | Err(_) => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::LineUp),
            MouseEventKind::ScrollDown => Some(Action::LineDown),
            _ => None,
        },
        InputEvent::Key(k) => map_key(k),
    }
}

fn map_key(k: KeyEvent) -> Option<Action> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('d') if ctrl => Some(Action::HalfPageDown),
        KeyCode::Char('u') if ctrl => Some(Action::HalfPageUp),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        // Navigation - vim style
        KeyCode::Down | KeyCode::Char('j') => Some(Action::LineDown),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::LineUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::GoTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::GoBottom),
        KeyCode::PageDown => Some(Action::HalfPageDown),
        KeyCode::PageUp => Some(Action::HalfPageUp),

        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        map_input_to_action(InputEvent::Key(KeyEvent::new(code, modifiers)))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key(KeyCode::Char('q'), KeyModifiers::NONE), Some(Action::Quit));
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Action::Quit));
        assert_eq!(key(KeyCode::Char('j'), KeyModifiers::NONE), Some(Action::LineDown));
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE), Some(Action::LineUp));
        assert_eq!(key(KeyCode::Char('G'), KeyModifiers::SHIFT), Some(Action::GoBottom));
        assert_eq!(
            key(KeyCode::Char('d'), KeyModifiers::CONTROL),
            Some(Action::HalfPageDown)
        );
        assert_eq!(key(KeyCode::Char('u'), KeyModifiers::CONTROL), Some(Action::HalfPageUp));
        assert_eq!(key(KeyCode::Char('r'), KeyModifiers::NONE), Some(Action::Refresh));
        assert_eq!(key(KeyCode::Char('?'), KeyModifiers::NONE), Some(Action::ToggleHelp));
        assert_eq!(key(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(map_input_to_action(InputEvent::Resize), Some(Action::Resize));
    }
}
