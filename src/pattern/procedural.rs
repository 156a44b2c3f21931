use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::{random_rotation, PatternSource};
use crate::{grid::Grid, Result};

#[rustfmt::skip]
const PATTERNS_3X3: [[[u8; 3]; 3]; 12] = [
    [[1, 0, 0], [1, 0, 0], [1, 1, 1]], // L
    [[1, 1, 1], [0, 1, 0], [0, 1, 0]], // T
    [[0, 1, 0], [0, 1, 0], [0, 1, 0]], // I
    [[1, 0, 1], [1, 1, 1], [1, 0, 1]], // H
    [[1, 1, 1], [1, 0, 1], [1, 1, 1]], // O
    [[1, 0, 1], [0, 1, 0], [1, 0, 1]], // X
    [[0, 1, 0], [1, 1, 1], [0, 1, 0]], // +
    [[1, 1, 1], [1, 0, 0], [1, 1, 1]], // C
    [[1, 0, 1], [1, 0, 1], [1, 1, 1]], // U
    [[1, 1, 0], [0, 1, 0], [0, 1, 1]], // Z
    [[1, 0, 0], [0, 1, 0], [0, 0, 1]], // \
    [[0, 0, 0], [1, 1, 1], [0, 0, 0]], // -
];

#[rustfmt::skip]
const PATTERNS_5X5: [[[u8; 5]; 5]; 10] = [
    [[0, 1, 1, 1, 0], [1, 0, 0, 0, 1], [1, 1, 1, 1, 1], [1, 0, 0, 0, 1], [1, 0, 0, 0, 1]], // A
    [[1, 1, 1, 1, 1], [1, 0, 0, 0, 0], [1, 1, 1, 1, 0], [1, 0, 0, 0, 0], [1, 1, 1, 1, 1]], // E
    [[1, 1, 1, 1, 1], [1, 0, 0, 0, 0], [1, 1, 1, 1, 0], [1, 0, 0, 0, 0], [1, 0, 0, 0, 0]], // F
    [[1, 0, 0, 0, 1], [1, 0, 0, 0, 1], [1, 1, 1, 1, 1], [1, 0, 0, 0, 1], [1, 0, 0, 0, 1]], // H
    [[1, 0, 0, 0, 0], [1, 0, 0, 0, 0], [1, 0, 0, 0, 0], [1, 0, 0, 0, 0], [1, 1, 1, 1, 1]], // L
    [[0, 1, 1, 1, 0], [1, 0, 0, 0, 1], [1, 0, 0, 0, 1], [1, 0, 0, 0, 1], [0, 1, 1, 1, 0]], // O
    [[1, 1, 1, 1, 1], [0, 0, 1, 0, 0], [0, 0, 1, 0, 0], [0, 0, 1, 0, 0], [0, 0, 1, 0, 0]], // T
    [[1, 0, 0, 0, 1], [0, 1, 0, 1, 0], [0, 0, 1, 0, 0], [0, 1, 0, 1, 0], [1, 0, 0, 0, 1]], // X
    [[1, 1, 1, 1, 1], [0, 0, 0, 1, 0], [0, 0, 1, 0, 0], [0, 1, 0, 0, 0], [1, 1, 1, 1, 1]], // Z
    [[1, 0, 0, 1, 0], [1, 0, 1, 0, 0], [1, 1, 0, 0, 0], [1, 0, 1, 0, 0], [1, 0, 0, 1, 0]], // K
];

/// A pattern set that draws uniformly from a fixed catalogue of hand-designed templates
pub struct ProceduralPatterns {
    name: String,
    templates: Vec<Grid>,
    rotate: bool,
    rng: StdRng,
}

impl ProceduralPatterns {
    /// Create a pattern set from a catalogue of templates
    ///
    /// **Panics** if `templates` is empty or the templates differ in shape
    pub fn new(name: impl Into<String>, templates: Vec<Grid>, rotate: bool, rng: StdRng) -> Self {
        assert!(!templates.is_empty(), "A pattern set needs at least one template");
        let shape = templates[0].shape();
        assert!(
            templates.iter().all(|t| t.shape() == shape),
            "All templates in a pattern set must share one shape"
        );

        Self {
            name: name.into(),
            templates,
            rotate,
            rng,
        }
    }

    /// Simple letter-like shapes on a 3x3 grid
    pub fn patterns_3x3(rotate: bool, rng: StdRng) -> Self {
        let templates = PATTERNS_3X3.iter().map(|t| Grid::from_rows(&t[..])).collect();
        Self::new("3x3", templates, rotate, rng)
    }

    /// Block capitals on a 5x5 grid
    pub fn patterns_5x5(rotate: bool, rng: StdRng) -> Self {
        let templates = PATTERNS_5X5.iter().map(|t| Grid::from_rows(&t[..])).collect();
        Self::new("5x5", templates, rotate, rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn templates(&self) -> &[Grid] {
        &self.templates
    }
}

impl PatternSource for ProceduralPatterns {
    fn shape(&self) -> (usize, usize) {
        self.templates[0].shape()
    }

    fn sample(&mut self) -> Result<Grid> {
        let grid = self
            .templates
            .choose(&mut self.rng)
            .cloned()
            .expect("templates are never empty");

        Ok(if self.rotate {
            random_rotation(grid, &mut self.rng)
        } else {
            grid
        })
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
