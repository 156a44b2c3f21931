use log::info;
use rand::{
    rngs::StdRng,
    seq::{index, SliceRandom},
    SeedableRng,
};

use super::{random_rotation, PatternSource};
use crate::{grid::Grid, Error, Result};

/// A labeled grayscale bitmap, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub label: Option<u8>,
    pub pixels: Vec<u8>,
}

/// Random access to a collection of equally-sized bitmaps
pub trait CorpusReader {
    /// Number of bitmaps in the corpus
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(height, width)` of every bitmap
    fn shape(&self) -> (usize, usize);

    /// Read the bitmap at `index`
    fn read(&mut self, index: usize) -> Result<Bitmap>;
}

/// A corpus held entirely in memory
#[derive(Debug, Clone)]
pub struct InMemoryCorpus {
    shape: (usize, usize),
    bitmaps: Vec<Bitmap>,
}

impl InMemoryCorpus {
    /// **Panics** if any bitmap does not hold exactly `height * width` pixels
    pub fn new(height: usize, width: usize, bitmaps: Vec<Bitmap>) -> Self {
        assert!(
            bitmaps.iter().all(|b| b.pixels.len() == height * width),
            "Every bitmap must hold height * width pixels"
        );
        Self {
            shape: (height, width),
            bitmaps,
        }
    }
}

impl CorpusReader for InMemoryCorpus {
    fn len(&self) -> usize {
        self.bitmaps.len()
    }

    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn read(&mut self, index: usize) -> Result<Bitmap> {
        self.bitmaps
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Corpus(format!("index {index} out of range")))
    }
}

/// A pattern set that draws binarized bitmaps from an external corpus
///
/// With a batch size, at most that many bitmaps are held in memory. A batch is drawn
/// without replacement and served in random order; once every bitmap in it has been
/// sampled, a fresh batch is read. Without a batch size, the full corpus is read on first
/// use and sampled uniformly with replacement.
pub struct CorpusPatterns {
    name: String,
    shape: (usize, usize),
    reader: Option<Box<dyn CorpusReader + Send>>,
    batch_size: Option<usize>,
    threshold: u8,
    transpose: bool,
    rotate: bool,
    rng: StdRng,
    cache: Vec<Bitmap>,
}

impl CorpusPatterns {
    /// Create an empty corpus pattern set producing `height x width` patterns
    ///
    /// Sampling fails with [`Error::NotReady`] until a reader is [attached](Self::attach).
    pub fn new(name: impl Into<String>, height: usize, width: usize, rng: StdRng) -> Self {
        assert!(height > 0 && width > 0, "Pattern dimensions must be non-zero");
        Self {
            name: name.into(),
            shape: (height, width),
            reader: None,
            batch_size: Some(1024),
            threshold: 128,
            transpose: false,
            rotate: false,
            rng,
            cache: Vec::new(),
        }
    }

    /// **Panics** if `batch_size` is `Some(0)`
    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Self {
        assert_ne!(batch_size, Some(0), "Batch size must be non-zero");
        self.batch_size = batch_size;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the corpus to sample from, discarding any cached bitmaps
    ///
    /// Fails if the corpus bitmaps do not match this set's shape.
    pub fn attach(&mut self, reader: Box<dyn CorpusReader + Send>) -> Result<()> {
        let (h, w) = reader.shape();
        let expected = if self.transpose { (w, h) } else { (h, w) };
        if expected != self.shape {
            return Err(Error::Corpus(format!(
                "corpus bitmaps are {h}x{w}, pattern set `{}` expects {}x{}",
                self.name, self.shape.0, self.shape.1
            )));
        }

        info!("{}: attached corpus of {} bitmaps", self.name, reader.len());
        self.reader = Some(reader);
        self.cache.clear();
        Ok(())
    }

    /// Number of bitmaps currently held in memory
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn next_bitmap(&mut self) -> Result<Bitmap> {
        let reader = match self.reader.as_mut() {
            Some(reader) if !reader.is_empty() => reader,
            _ => return Err(Error::NotReady),
        };
        let len = reader.len();

        match self.batch_size {
            Some(batch_size) => {
                if self.cache.is_empty() {
                    let amount = batch_size.min(len);
                    let batch = index::sample(&mut self.rng, len, amount)
                        .into_iter()
                        .map(|i| reader.read(i))
                        .collect::<Result<Vec<_>>>()?;
                    info!("{}: loaded batch of {} bitmaps", self.name, batch.len());
                    self.cache = batch;
                }
                Ok(self.cache.pop().expect("batch was just filled"))
            }
            None => {
                if self.cache.is_empty() {
                    self.cache = (0..len).map(|i| reader.read(i)).collect::<Result<Vec<_>>>()?;
                    info!("{}: loaded full corpus of {} bitmaps", self.name, len);
                }
                Ok(self
                    .cache
                    .choose(&mut self.rng)
                    .cloned()
                    .expect("corpus is not empty"))
            }
        }
    }
}

impl PatternSource for CorpusPatterns {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn sample(&mut self) -> Result<Grid> {
        let bitmap = self.next_bitmap()?;
        let (h, w) = if self.transpose {
            (self.shape.1, self.shape.0)
        } else {
            self.shape
        };

        let mut grid = Grid::binarize(h, w, &bitmap.pixels, self.threshold);
        if self.transpose {
            grid = grid.transpose();
        }
        if self.rotate {
            grid = random_rotation(grid, &mut self.rng);
        }

        Ok(grid)
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        // The current batch was drawn with the old generator
        if self.batch_size.is_some() {
            self.cache.clear();
        }
    }
}
