use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// A key going down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyTransition {
    Press(KeyCode),
    Release(KeyCode),
}

/// Takes an event, checks if it is a key event, and returns the transition it represents
///
/// Auto-repeat is reported as another press.
pub(super) fn key_transition(event: &Event) -> Option<KeyTransition> {
    let Event::Key(key) = event else {
        return None;
    };

    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(KeyTransition::Press(key.code)),
        KeyEventKind::Release => Some(KeyTransition::Release(key.code)),
    }
}

/// Whether the event is Ctrl-C, which raw mode delivers as a plain key press
pub(super) fn is_interrupt(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}
