//! Input routing for the dashboard runtime.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the event loop should do with one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    Ignore,
}

/// `q`, `Q` and Ctrl-C quit; every other event is a no-op.
#[must_use]
pub fn resolve_event(event: &Event) -> InputAction {
    match event {
        Event::Key(key) => resolve_key(key),
        _ => InputAction::Ignore,
    }
}

fn resolve_key(key: &KeyEvent) -> InputAction {
    // Key-up events arrive on some platforms; only presses count.
    if key.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            InputAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        _ => InputAction::Ignore,
    }
}
