use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};
use tui_logger::TuiLoggerWidget;

use super::{
    controls::Controls,
    tui::{self, Tui},
};
use crate::{env::Observation, grid::Grid, input::KeyState};

/// Longest single wait on the input queue while pacing frames
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A terminal window showing the reference and work patterns side by side
///
/// Keyboard input is tracked by [`Controls`]. Pressing `q` or `Esc`, or Ctrl-C, requests
/// a quit; the request sticks until the viewer is dropped.
pub struct Viewer {
    terminal: Tui,
    controls: Controls,
    closed: bool,
}

impl Viewer {
    /// Take over the terminal
    ///
    /// Fails if stdout is not an interactive terminal.
    pub fn open() -> io::Result<Self> {
        let (terminal, release_events) = tui::init()?;
        Ok(Self {
            terminal,
            controls: Controls::new(release_events),
            closed: false,
        })
    }

    pub fn keys(&self) -> &KeyState<KeyCode> {
        self.controls.keys()
    }

    /// Keys that went down during the most recent [`poll`](Self::poll), in order
    pub fn pressed(&self) -> &[KeyCode] {
        self.controls.pressed()
    }

    /// Whether the user asked to stop
    pub fn should_quit(&self) -> bool {
        self.controls.quit_requested() || self.closed
    }

    /// Draw an observation with a one-line status beneath it
    pub fn draw(&mut self, observation: &Observation, status: &str) -> io::Result<()> {
        let view = PatternView {
            observation,
            status,
        };
        self.terminal
            .draw(|frame| frame.render_widget(view, frame.size()))?;
        Ok(())
    }

    /// Drain pending input, waiting up to `timeout` for the first event
    ///
    /// Terminals that only report presses get every held key released at the start of
    /// the next poll, so each press is seen as a fresh edge.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<()> {
        self.controls.begin_poll();

        let mut timeout = timeout;
        while event::poll(timeout)? {
            let event = event::read()?;
            self.controls.handle(&event);
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    /// Keep processing input until `duration` has elapsed
    ///
    /// **Returns** `false` as soon as a quit is requested, `true` otherwise
    pub fn wait(&mut self, duration: Duration) -> io::Result<bool> {
        let start = Instant::now();
        self.poll(Duration::ZERO)?;

        loop {
            if self.should_quit() {
                return Ok(false);
            }
            let remaining = duration.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Ok(true);
            }
            self.poll(remaining.min(POLL_INTERVAL))?;
        }
    }

    /// Hand the terminal back
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tui::restore()
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Reference and work grids, a status line, and the log
struct PatternView<'a> {
    observation: &'a Observation,
    status: &'a str,
}

impl Widget for PatternView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Observation {
            work, reference, ..
        } = self.observation;
        let (rows, cols) = work.shape();
        let grid_width = 2 * cols as u16 + 2;

        let [grids_area, status_area, log_area] = Layout::vertical([
            Constraint::Length(rows as u16 + 2),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let [reference_area, work_area, _] = Layout::horizontal([
            Constraint::Length(grid_width.max(11)),
            Constraint::Length(grid_width.max(6)),
            Constraint::Fill(1),
        ])
        .areas(grids_area);

        let block = Block::bordered().border_type(BorderType::Rounded);

        let inner = block.clone().title("Reference").inner(reference_area);
        block.clone().title("Reference").render(reference_area, buf);
        draw_grid(buf, inner, reference, |pos| {
            if reference.is_set(pos) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        });

        let agent = self.observation.agent();
        let inner = block.clone().title("Work").inner(work_area);
        block.title("Work").render(work_area, buf);
        draw_grid(buf, inner, work, |pos| {
            let style = match (work.is_set(pos), reference.is_set(pos)) {
                (false, _) => Style::default().fg(Color::DarkGray),
                (true, true) => Style::default().fg(Color::LightGreen),
                (true, false) => Style::default().fg(Color::LightRed),
            };
            if Some(pos) == agent {
                style.bg(Color::Yellow)
            } else {
                style
            }
        });

        Paragraph::new(self.status)
            .style(Style::default().cyan())
            .render(status_area, buf);

        TuiLoggerWidget::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Log"),
            )
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .output_separator(' ')
            .render(log_area, buf);
    }
}

/// Two columns per cell: a block for set cells, a dot otherwise
fn draw_grid(buf: &mut Buffer, area: Rect, grid: &Grid, style: impl Fn((usize, usize)) -> Style) {
    for (row, cells) in grid.iter_rows().enumerate() {
        let y = area.y + row as u16;
        if y >= area.bottom() {
            break;
        }
        for (col, &cell) in cells.iter().enumerate() {
            let x = area.x + 2 * col as u16;
            if x + 1 >= area.right() {
                break;
            }
            let symbol = if cell == 1 { "██" } else { "· " };
            buf.set_string(x, y, symbol, style((row, col)));
        }
    }
}
