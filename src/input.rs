//! Key and mouse bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

/// Action from one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Left click at a terminal position (column, row).
    Click { column: u16, row: u16 },
    Reset,
    Quit,
    None,
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = key;
    if kind != KeyEventKind::Press {
        return Action::None;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char('r' | 'R') if no_mod => Action::Reset,
        _ => Action::None,
    }
}

/// Map any terminal event to an action. Only left-button presses count as clicks.
pub fn event_to_action(event: &Event) -> Action {
    match event {
        Event::Key(key) => key_to_action(*key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Action::Click {
                column: mouse.column,
                row: mouse.row,
            },
            _ => Action::None,
        },
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_reset_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('r'), KeyModifiers::NONE)), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Char('R'), KeyModifiers::SHIFT)), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Char('r'), KeyModifiers::ALT)), Action::None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('c'), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut k = key(KeyCode::Char('r'), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(k), Action::None);
    }

    #[test]
    fn test_left_press_is_click() {
        assert_eq!(
            event_to_action(&mouse(MouseEventKind::Down(MouseButton::Left), 7, 3)),
            Action::Click { column: 7, row: 3 }
        );
        assert_eq!(
            event_to_action(&mouse(MouseEventKind::Down(MouseButton::Right), 7, 3)),
            Action::None
        );
        assert_eq!(
            event_to_action(&mouse(MouseEventKind::Up(MouseButton::Left), 7, 3)),
            Action::None
        );
        assert_eq!(event_to_action(&mouse(MouseEventKind::Moved, 1, 1)), Action::None);
    }
}
