use crate::{env::Observation, grid::Grid};

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];
const RED: [u8; 3] = [255, 0, 0];

/// How to present the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Print bordered text grids to stdout
    Text,
    /// Rasterize into a [`PixelFrame`]
    Pixels,
}

/// Render an observation; text is printed, pixels are returned
pub fn render(observation: &Observation, mode: RenderMode, cell_size: u32) -> Option<PixelFrame> {
    match mode {
        RenderMode::Text => {
            print!("{}", text(observation));
            None
        }
        RenderMode::Pixels => Some(PixelFrame::draw(observation, cell_size)),
    }
}

/// The reference and work patterns side by side
///
/// In the reference, `o` marks a set cell. In the work pattern, `o` marks a filled cell
/// that is set in the reference and `x` one that is not.
pub fn text(observation: &Observation) -> String {
    let Observation {
        work, reference, ..
    } = observation;
    let rule = "―".repeat(2 * (work.cols() + 2));

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');

    for (row, (w, r)) in work.iter_rows().zip(reference.iter_rows()).enumerate() {
        let reference_line: String = r.iter().map(|&c| if c == 1 { 'o' } else { ' ' }).collect();
        let work_line: String = w
            .iter()
            .enumerate()
            .map(|(col, &c)| match (c, reference.is_set((row, col))) {
                (0, _) => ' ',
                (_, true) => 'o',
                (_, false) => 'x',
            })
            .collect();
        out.push_str(&format!("|{reference_line}||{work_line}|\n"));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// An RGB image, row-major with the origin at the top left
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFrame {
    pub width: u32,
    pub height: u32,
    /// Three bytes per pixel
    pub data: Vec<u8>,
}

impl PixelFrame {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: WHITE.repeat((width * height) as usize),
        }
    }

    /// Frame dimensions for a `rows x cols` grid: one cell of margin around each pattern
    /// and two between them
    pub fn size(rows: usize, cols: usize, cell_size: u32) -> (u32, u32) {
        let width = (2 * cols as u32 + 4) * cell_size;
        let height = (rows as u32 + 2) * cell_size;
        (width, height)
    }

    /// Draw the reference pattern on the left and the work pattern with the agent marker
    /// on the right
    ///
    /// The marker is left out if the observation has no agent position.
    pub fn draw(observation: &Observation, cell_size: u32) -> Self {
        let (rows, cols) = observation.work.shape();
        let (width, height) = Self::size(rows, cols, cell_size);
        let mut frame = Self::blank(width, height);

        frame.draw_pattern(&observation.reference, (cell_size, cell_size), cell_size);

        let work_origin = (width / 2 + cell_size, cell_size);
        frame.draw_pattern(&observation.work, work_origin, cell_size);

        if let Some((row, col)) = observation.agent() {
            let cell_origin = (
                work_origin.0 + col as u32 * cell_size,
                work_origin.1 + row as u32 * cell_size,
            );
            frame.draw_marker(cell_origin, cell_size);
        }

        frame
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = 3 * (y * self.width + x) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let i = 3 * (y * self.width + x) as usize;
            self.data[i..i + 3].copy_from_slice(&color);
        }
    }

    fn draw_pattern(&mut self, pattern: &Grid, (x0, y0): (u32, u32), cell_size: u32) {
        for (row, cells) in pattern.iter_rows().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                let x = x0 + col as u32 * cell_size;
                let y = y0 + row as u32 * cell_size;
                self.draw_cell((x, y), cell_size, cell == 1);
            }
        }
    }

    /// A filled square, or just its outline
    fn draw_cell(&mut self, (x0, y0): (u32, u32), cell_size: u32, filled: bool) {
        for dy in 0..cell_size {
            for dx in 0..cell_size {
                let edge = dx == 0 || dy == 0 || dx == cell_size - 1 || dy == cell_size - 1;
                if filled || edge {
                    self.put(x0 + dx, y0 + dy, BLACK);
                }
            }
        }
    }

    /// A disc of radius `cell_size / 4` centred in the cell
    fn draw_marker(&mut self, (x0, y0): (u32, u32), cell_size: u32) {
        let radius = cell_size as f32 / 4.0;
        let centre = cell_size as f32 / 2.0;
        for dy in 0..cell_size {
            for dx in 0..cell_size {
                let (fx, fy) = (dx as f32 + 0.5 - centre, dy as f32 + 0.5 - centre);
                if fx * fx + fy * fy <= radius * radius {
                    self.put(x0 + dx, y0 + dy, RED);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        let reference = Grid::from_rows(&[[1, 0], [0, 1]]);
        let work = Grid::from_rows(&[[1, 1], [0, 0]]);
        Observation {
            work,
            reference,
            position: Grid::one_hot(2, 2, (1, 0)),
        }
    }

    #[test]
    fn text_layout() {
        let expected = "\
――――――――
|o ||ox|
| o||  |
――――――――
";
        assert_eq!(text(&observation()), expected, "reference then work, bordered");
    }

    #[test]
    fn frame_geometry() {
        let frame = PixelFrame::draw(&observation(), 10);
        assert_eq!((frame.width, frame.height), (80, 40), "sized from cell size and grid");
        assert_eq!(frame.data.len(), 80 * 40 * 3, "three bytes per pixel");

        assert_eq!(frame.pixel(0, 0), WHITE, "margin is blank");
        assert_eq!(frame.pixel(15, 15), BLACK, "filled reference cell");
        assert_eq!(frame.pixel(25, 15), WHITE, "unfilled reference cell interior");
        assert_eq!(frame.pixel(20, 15), BLACK, "unfilled cell outline");

        // Work pattern starts at x = 40 + 10
        assert_eq!(frame.pixel(65, 15), BLACK, "filled work cell");
        assert_eq!(frame.pixel(55, 25), RED, "agent marker at (1, 0)");
        assert_eq!(frame.pixel(15, 25), WHITE, "no marker on the reference side");
    }

    #[test]
    fn missing_agent_draws_no_marker() {
        let mut observation = observation();
        observation.position = Grid::zeros(2, 2);
        assert_eq!(observation.agent(), None, "empty position layer");

        let frame = PixelFrame::draw(&observation, 10);
        assert!(!frame.data.chunks(3).any(|p| p == RED), "no marker drawn");
        assert_eq!(frame.pixel(65, 15), BLACK, "patterns still drawn");
        assert_eq!(text(&observation).lines().count(), 4, "text render unaffected");
    }
}
