use crossterm::event::{Event, KeyCode};

use super::util::{is_interrupt, key_transition, KeyTransition};
use crate::input::KeyState;

/// Keyboard handling for the viewer, independent of the terminal it reads from
///
/// Pressing `q` or `Esc`, or Ctrl-C, latches a quit request.
#[derive(Debug, Clone)]
pub struct Controls {
    keys: KeyState<KeyCode>,
    pressed: Vec<KeyCode>,
    release_events: bool,
    quit: bool,
}

impl Controls {
    /// `release_events` says whether the terminal reports key releases
    pub fn new(release_events: bool) -> Self {
        Self {
            keys: KeyState::new(),
            pressed: Vec::new(),
            release_events,
            quit: false,
        }
    }

    pub fn keys(&self) -> &KeyState<KeyCode> {
        &self.keys
    }

    /// Keys that went down since the last [`begin_poll`](Self::begin_poll), in order
    pub fn pressed(&self) -> &[KeyCode] {
        &self.pressed
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Start a new round of input
    ///
    /// Without release events every held key is released here, so each press is seen as
    /// a fresh edge.
    pub fn begin_poll(&mut self) {
        self.pressed.clear();
        if !self.release_events {
            let held: Vec<_> = self.keys.down().collect();
            for key in held {
                self.keys.on_release(key);
            }
        }
    }

    pub fn handle(&mut self, event: &Event) {
        if is_interrupt(event) {
            self.quit = true;
            return;
        }

        match key_transition(event) {
            Some(KeyTransition::Press(code)) => {
                self.keys.on_press(code);
                if self.keys.was_pressed(code) {
                    self.pressed.push(code);
                }
            }
            Some(KeyTransition::Release(code)) => self.keys.on_release(code),
            None => return,
        }

        if self.keys.was_pressed(KeyCode::Esc) || self.keys.was_pressed(KeyCode::Char('q')) {
            self.quit = true;
        }
    }
}
