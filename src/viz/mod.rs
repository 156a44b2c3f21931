//! Terminal front end: a live view of the environment with keyboard input and a log pane

use std::{
    io, thread,
    time::{Duration, Instant},
};

use crossterm::event::KeyCode;
use log::{warn, LevelFilter, SetLoggerError};

use crate::{env::Observation, input::KeyState, render};

mod controls;
mod tui;
mod util;
mod viewer;

pub use controls::Controls;
pub use viewer::Viewer;

/// Route `log` records to the viewer's log pane
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    Ok(())
}

/// A terminal viewer when one is available, printed text otherwise
pub enum Display {
    Terminal(Viewer),
    Text,
}

impl Display {
    /// Open a terminal viewer, falling back to text if the terminal cannot be taken over
    pub fn open() -> Self {
        match Viewer::open() {
            Ok(viewer) => Self::Terminal(viewer),
            Err(e) => {
                warn!("terminal viewer unavailable ({e}), rendering as text");
                Self::Text
            }
        }
    }

    pub fn show(&mut self, observation: &Observation, status: &str) -> io::Result<()> {
        match self {
            Self::Terminal(viewer) => viewer.draw(observation, status),
            Self::Text => {
                print!("{}", render::text(observation));
                println!("{status}");
                Ok(())
            }
        }
    }

    /// Drain pending input, waiting up to `timeout` for the first event
    pub fn poll(&mut self, timeout: Duration) -> io::Result<()> {
        match self {
            Self::Terminal(viewer) => viewer.poll(timeout),
            Self::Text => {
                thread::sleep(timeout);
                Ok(())
            }
        }
    }

    /// Keys pressed during the most recent poll
    pub fn pressed(&self) -> &[KeyCode] {
        match self {
            Self::Terminal(viewer) => viewer.pressed(),
            Self::Text => &[],
        }
    }

    /// Keyboard state, if input is available
    pub fn keys(&self) -> Option<&KeyState<KeyCode>> {
        match self {
            Self::Terminal(viewer) => Some(viewer.keys()),
            Self::Text => None,
        }
    }

    pub fn should_quit(&self) -> bool {
        match self {
            Self::Terminal(viewer) => viewer.should_quit(),
            Self::Text => false,
        }
    }

    /// Pace a frame; see [`Viewer::wait`]
    pub fn wait(&mut self, duration: Duration) -> io::Result<bool> {
        match self {
            Self::Terminal(viewer) => viewer.wait(duration),
            Self::Text => {
                let start = Instant::now();
                while start.elapsed() < duration {
                    let remaining = duration.saturating_sub(start.elapsed());
                    thread::sleep(remaining.min(Duration::from_millis(5)));
                }
                Ok(true)
            }
        }
    }

    pub fn close(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(viewer) => viewer.close(),
            Self::Text => Ok(()),
        }
    }
}
