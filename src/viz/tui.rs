use std::{
    io::{self, stdout, IsTerminal, Stdout},
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        Once,
    },
};

use crossterm as ct;
use ct::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// A type alias for the terminal type used by the viewer
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Whether keyboard enhancement flags are currently pushed
static ENHANCED: AtomicBool = AtomicBool::new(false);

/// Initialize the tui
///
/// On failure every step already taken is undone, leaving the terminal as it was.
///
/// **Returns** the terminal and whether it reports key release events
pub fn init() -> io::Result<(Tui, bool)> {
    if !stdout().is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stdout is not a terminal",
        ));
    }

    init_panic_hook();
    let mut rollback = Rollback::default();

    enable_raw_mode()?;
    rollback.push(disable_raw_mode);
    ct::execute!(stdout(), EnterAlternateScreen)?;
    rollback.push(|| ct::execute!(stdout(), LeaveAlternateScreen));

    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        ct::execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        ENHANCED.store(true, Ordering::SeqCst);
        rollback.push(pop_enhancement);
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    rollback.commit();
    Ok((terminal, release_events))
}

/// Restore the terminal to its original state
pub fn restore() -> io::Result<()> {
    pop_enhancement()?;
    ct::execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn pop_enhancement() -> io::Result<()> {
    if ENHANCED.swap(false, Ordering::SeqCst) {
        ct::execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    Ok(())
}

/// Setup panic hook, once per process
fn init_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore();
            original_hook(panic_info);
        }));
    });
}

type Undo = Box<dyn FnOnce() -> io::Result<()>>;

/// Undo steps run in reverse order on drop unless committed
#[derive(Default)]
struct Rollback {
    steps: Vec<Undo>,
}

impl Rollback {
    fn push(&mut self, undo: impl FnOnce() -> io::Result<()> + 'static) {
        self.steps.push(Box::new(undo));
    }

    fn commit(mut self) {
        self.steps.clear();
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        while let Some(undo) = self.steps.pop() {
            let _ = undo();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<u8>>>, id: u8) -> impl FnOnce() -> io::Result<()> + 'static {
        let log = Rc::clone(log);
        move || {
            log.borrow_mut().push(id);
            Ok(())
        }
    }

    fn failing_setup(log: &Rc<RefCell<Vec<u8>>>) -> io::Result<()> {
        let mut rollback = Rollback::default();
        rollback.push(recorder(log, 1));
        rollback.push(|| Err(io::Error::other("undo failed")));
        rollback.push(recorder(log, 3));
        Err(io::Error::other("setup failed"))
    }

    #[test]
    fn rollback_undoes_in_reverse_on_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(failing_setup(&log).is_err());
        assert_eq!(*log.borrow(), [3, 1], "every step undone, latest first, past failing undos");
    }

    #[test]
    fn committed_rollback_does_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut rollback = Rollback::default();
        rollback.push(recorder(&log, 1));
        rollback.commit();
        assert!(log.borrow().is_empty(), "commit keeps the setup");
    }
}
