//! Sources of reference patterns for the writing environment
//!
//! A [`PatternSource`] hands out a fresh binary [`Grid`] of a fixed shape on every
//! [`sample`](PatternSource::sample). Each source owns its own random number generator,
//! so two sources seeded identically produce identical pattern sequences regardless of
//! what any other source or thread is doing.

mod corpus;
mod idx;
mod procedural;

use std::path::PathBuf;

pub use corpus::{Bitmap, CorpusPatterns, CorpusReader, InMemoryCorpus};
pub use idx::IdxCorpus;
use log::debug;
pub use procedural::ProceduralPatterns;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{grid::Grid, Error, Result};

/// Names accepted by [`pattern_set`]
pub const PATTERN_SET_NAMES: [&str; 4] = ["3x3", "5x5", "emnist-letters", "emnist-digits"];

/// Height and width of EMNIST bitmaps
pub const EMNIST_SIZE: usize = 28;

/// A generator of reference patterns with a fixed shape
pub trait PatternSource {
    /// `(height, width)` of every sampled pattern
    fn shape(&self) -> (usize, usize);

    /// Draw the next pattern
    fn sample(&mut self) -> Result<Grid>;

    /// Reseed the internal random number generator
    ///
    /// After reseeding with the same value, subsequent calls to [`sample`](Self::sample)
    /// return the same sequence of patterns.
    fn seed(&mut self, seed: u64);
}

/// A named family of pattern generators, chosen at construction time
pub enum PatternSet {
    Procedural(ProceduralPatterns),
    Corpus(CorpusPatterns),
}

impl PatternSet {
    pub fn name(&self) -> &str {
        match self {
            Self::Procedural(p) => p.name(),
            Self::Corpus(c) => c.name(),
        }
    }
}

impl PatternSource for PatternSet {
    fn shape(&self) -> (usize, usize) {
        match self {
            Self::Procedural(p) => p.shape(),
            Self::Corpus(c) => c.shape(),
        }
    }

    fn sample(&mut self) -> Result<Grid> {
        match self {
            Self::Procedural(p) => p.sample(),
            Self::Corpus(c) => c.sample(),
        }
    }

    fn seed(&mut self, seed: u64) {
        match self {
            Self::Procedural(p) => p.seed(seed),
            Self::Corpus(c) => c.seed(seed),
        }
    }
}

impl From<ProceduralPatterns> for PatternSet {
    fn from(value: ProceduralPatterns) -> Self {
        Self::Procedural(value)
    }
}

impl From<CorpusPatterns> for PatternSet {
    fn from(value: CorpusPatterns) -> Self {
        Self::Corpus(value)
    }
}

/// Configuration for a corpus-backed pattern set
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Path to an IDX3 image file
    pub images: PathBuf,
    /// Optional path to the matching IDX1 label file
    pub labels: Option<PathBuf>,
    /// How many bitmaps to hold in memory at once; `None` loads the whole corpus
    pub batch_size: Option<usize>,
    /// Intensities at or above this value become set cells
    pub threshold: u8,
    /// Swap rows and columns of every bitmap (EMNIST stores them column-major)
    pub transpose: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            images: PathBuf::new(),
            labels: None,
            batch_size: Some(1024),
            threshold: 128,
            transpose: true,
        }
    }
}

/// Configuration for [`pattern_set`]
#[derive(Debug, Clone)]
pub struct PatternSetConfig {
    /// One of [`PATTERN_SET_NAMES`]
    pub name: String,
    /// Rotate each sampled pattern by a random multiple of 90 degrees
    pub rotate: bool,
    /// Seed for the set's random number generator; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Data files for the EMNIST sets. Without them the set is built empty and
    /// sampling fails with [`Error::NotReady`].
    pub corpus: Option<CorpusConfig>,
}

impl Default for PatternSetConfig {
    fn default() -> Self {
        Self {
            name: String::from("3x3"),
            rotate: false,
            seed: None,
            corpus: None,
        }
    }
}

/// Build a pattern set by name
pub fn pattern_set(config: &PatternSetConfig) -> Result<PatternSet> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let set: PatternSet = match config.name.as_str() {
        "3x3" => ProceduralPatterns::patterns_3x3(config.rotate, rng).into(),
        "5x5" => ProceduralPatterns::patterns_5x5(config.rotate, rng).into(),
        name @ ("emnist-letters" | "emnist-digits") => {
            let mut patterns = CorpusPatterns::new(name, EMNIST_SIZE, EMNIST_SIZE, rng)
                .with_rotation(config.rotate);

            if let Some(corpus) = &config.corpus {
                let reader = IdxCorpus::open(&corpus.images, corpus.labels.as_deref())?;
                patterns = patterns
                    .with_batch_size(corpus.batch_size)
                    .with_threshold(corpus.threshold)
                    .with_transpose(corpus.transpose);
                patterns.attach(Box::new(reader))?;
            }

            patterns.into()
        }
        other => return Err(Error::UnknownPatternSet(other.to_string())),
    };

    debug!("built pattern set `{}` with shape {:?}", config.name, set.shape());
    Ok(set)
}

/// Rotate by a random multiple of 90 degrees
///
/// Non-square grids only take half turns so their shape is preserved.
fn random_rotation(grid: Grid, rng: &mut StdRng) -> Grid {
    let k = if grid.rows() == grid.cols() {
        rng.gen_range(0..4)
    } else {
        2 * rng.gen_range(0..2)
    };
    grid.rot90(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_set_by_name() {
        for name in ["3x3", "5x5"] {
            let config = PatternSetConfig {
                name: name.to_string(),
                seed: Some(7),
                ..Default::default()
            };
            let mut set = pattern_set(&config).unwrap();
            assert_eq!(set.name(), name, "name preserved");
            let grid = set.sample().unwrap();
            assert_eq!(grid.shape(), set.shape(), "sample matches declared shape");
        }
    }

    #[test]
    fn unknown_pattern_set_rejected() {
        let config = PatternSetConfig {
            name: String::from("4x4"),
            ..Default::default()
        };
        assert!(
            matches!(pattern_set(&config), Err(Error::UnknownPatternSet(n)) if n == "4x4"),
            "unknown names are rejected"
        );
    }

    #[test]
    fn emnist_without_files_is_not_ready() {
        let config = PatternSetConfig {
            name: String::from("emnist-letters"),
            ..Default::default()
        };
        let mut set = pattern_set(&config).unwrap();
        assert_eq!(set.shape(), (EMNIST_SIZE, EMNIST_SIZE), "EMNIST shape");
        assert!(matches!(set.sample(), Err(Error::NotReady)), "sampling fails until data is attached");
    }

    #[test]
    fn seeding_reproduces_sequence() {
        let config = PatternSetConfig {
            rotate: true,
            ..Default::default()
        };
        let mut set = pattern_set(&config).unwrap();

        set.seed(42);
        let first: Vec<_> = (0..20).map(|_| set.sample().unwrap()).collect();
        set.seed(42);
        let second: Vec<_> = (0..20).map(|_| set.sample().unwrap()).collect();

        assert_eq!(first, second, "same seed yields the same patterns and rotations");
    }

    /// Writes an EMNIST-sized IDX3 file where bitmap `i` has a bright pixel at stored
    /// `(0, i)` and a dim one at stored `(1, i)`
    fn write_emnist(name: &str, count: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!("scribe-{}-{name}", std::process::id()));
        let mut bytes = Vec::new();
        for v in [0x0803, count as u32, EMNIST_SIZE as u32, EMNIST_SIZE as u32] {
            bytes.extend(u32::to_be_bytes(v));
        }
        for i in 0..count {
            let mut pixels = vec![0u8; EMNIST_SIZE * EMNIST_SIZE];
            pixels[i] = 255;
            pixels[EMNIST_SIZE + i] = 40;
            bytes.extend(pixels);
        }
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn emnist_from_idx_files() {
        let images = write_emnist("letters.idx3", 4);
        let config = PatternSetConfig {
            name: String::from("emnist-letters"),
            seed: Some(3),
            corpus: Some(CorpusConfig {
                images: images.clone(),
                batch_size: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut set = pattern_set(&config).unwrap();
        let cached = |set: &PatternSet| match set {
            PatternSet::Corpus(c) => c.cached(),
            PatternSet::Procedural(_) => unreachable!("emnist is corpus-backed"),
        };

        let mut first = Vec::new();
        for expected_cache in [1, 0, 1] {
            let grid = set.sample().unwrap();
            assert_eq!(grid.shape(), (EMNIST_SIZE, EMNIST_SIZE), "EMNIST shape");
            assert_eq!(grid.count(), 1, "dim pixel is thresholded away");
            let row = (0..4)
                .find(|&r| grid.is_set((r, 0)))
                .expect("stored row 0 becomes column 0 after transposing");
            assert!(!grid.is_set((row, 1)), "stored row 1 is column 1");
            assert_eq!(cached(&set), expected_cache, "batch of two drains, then refills");
            first.push(grid);
        }
        assert_ne!(first[0], first[1], "a batch is drawn without replacement");

        set.seed(3);
        let second: Vec<_> = (0..3).map(|_| set.sample().unwrap()).collect();
        assert_eq!(first, second, "reseeding reproduces the sequence");

        std::fs::remove_file(images).unwrap();
    }

    #[test]
    fn random_rotation_preserves_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let grid = Grid::from_rows(&[[1, 0, 0], [0, 0, 0]]);
        for _ in 0..16 {
            let rotated = random_rotation(grid.clone(), &mut rng);
            assert_eq!(rotated.shape(), (2, 3), "non-square grids keep their shape");
            assert_eq!(rotated.count(), 1, "rotation preserves set cells");
        }
    }
}
