use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use log::debug;

use super::corpus::{Bitmap, CorpusReader};
use crate::{Error, Result};

const IMAGE_MAGIC: u32 = 0x0000_0803;
const LABEL_MAGIC: u32 = 0x0000_0801;
const IMAGE_HEADER_LEN: u64 = 16;
const LABEL_HEADER_LEN: u64 = 8;

/// A corpus stored in the IDX format used by MNIST and EMNIST
///
/// Headers and labels are read when the corpus is opened; bitmaps are read from disk on
/// demand so only the batch currently in use is held in memory.
pub struct IdxCorpus {
    images: BufReader<File>,
    len: usize,
    shape: (usize, usize),
    labels: Option<Vec<u8>>,
}

impl IdxCorpus {
    /// Open an IDX3 image file and an optional IDX1 label file
    pub fn open(images: impl AsRef<Path>, labels: Option<&Path>) -> Result<Self> {
        let mut file = BufReader::new(File::open(images.as_ref())?);

        let magic = read_u32(&mut file)?;
        if magic != IMAGE_MAGIC {
            return Err(Error::Corpus(format!("bad image file magic {magic:#010x}")));
        }
        let len = read_u32(&mut file)? as usize;
        let rows = read_u32(&mut file)? as usize;
        let cols = read_u32(&mut file)? as usize;
        if rows == 0 || cols == 0 {
            return Err(Error::Corpus(String::from("image dimensions must be non-zero")));
        }
        let body = (len as u64)
            .checked_mul(rows as u64)
            .and_then(|n| n.checked_mul(cols as u64));
        check_body(&file, IMAGE_HEADER_LEN, body, "image")?;

        let labels = labels.map(read_labels).transpose()?;
        if let Some(labels) = &labels {
            if labels.len() != len {
                return Err(Error::Corpus(format!(
                    "{} labels for {} images",
                    labels.len(),
                    len
                )));
            }
        }

        debug!(
            "opened IDX corpus {} with {len} images of {rows}x{cols}",
            images.as_ref().display()
        );

        Ok(Self {
            images: file,
            len,
            shape: (rows, cols),
            labels,
        })
    }
}

impl CorpusReader for IdxCorpus {
    fn len(&self) -> usize {
        self.len
    }

    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn read(&mut self, index: usize) -> Result<Bitmap> {
        if index >= self.len {
            return Err(Error::Corpus(format!("index {index} out of range")));
        }

        let size = self.shape.0 * self.shape.1;
        let offset = IMAGE_HEADER_LEN + (index * size) as u64;
        self.images.seek(SeekFrom::Start(offset))?;
        let mut pixels = vec![0; size];
        self.images.read_exact(&mut pixels)?;

        Ok(Bitmap {
            label: self.labels.as_ref().map(|l| l[index]),
            pixels,
        })
    }
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Fail unless the file holds the `body` bytes its header promises
fn check_body(file: &BufReader<File>, header: u64, body: Option<u64>, kind: &str) -> Result<()> {
    let actual = file.get_ref().metadata()?.len();
    match body.and_then(|b| b.checked_add(header)) {
        Some(expected) if expected <= actual => Ok(()),
        _ => Err(Error::Corpus(format!(
            "{kind} file header promises more data than its {actual} bytes"
        ))),
    }
}

fn read_labels(path: &Path) -> Result<Vec<u8>> {
    let mut file = BufReader::new(File::open(path)?);

    let magic = read_u32(&mut file)?;
    if magic != LABEL_MAGIC {
        return Err(Error::Corpus(format!("bad label file magic {magic:#010x}")));
    }
    let len = read_u32(&mut file)? as usize;
    check_body(&file, LABEL_HEADER_LEN, Some(len as u64), "label")?;

    let mut labels = vec![0; len];
    file.read_exact(&mut labels)?;
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scribe-{}-{name}", std::process::id()))
    }

    fn write_images(path: &Path, images: &[[u8; 6]]) {
        let mut bytes = Vec::new();
        for v in [IMAGE_MAGIC, images.len() as u32, 2, 3] {
            bytes.extend(v.to_be_bytes());
        }
        for image in images {
            bytes.extend(image);
        }
        fs::write(path, bytes).unwrap();
    }

    fn write_labels(path: &Path, labels: &[u8]) {
        let mut bytes = Vec::new();
        for v in [LABEL_MAGIC, labels.len() as u32] {
            bytes.extend(v.to_be_bytes());
        }
        bytes.extend(labels);
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn idx_functional() {
        let images = temp_path("images.idx3");
        let labels = temp_path("labels.idx1");
        write_images(&images, &[[0, 1, 2, 3, 4, 5], [9, 9, 9, 0, 0, 0]]);
        write_labels(&labels, &[4, 7]);

        let mut corpus = IdxCorpus::open(&images, Some(labels.as_path())).unwrap();
        assert_eq!(corpus.len(), 2, "length from header");
        assert_eq!(corpus.shape(), (2, 3), "shape from header");

        let second = corpus.read(1).unwrap();
        assert_eq!(second.pixels, [9, 9, 9, 0, 0, 0], "second bitmap read");
        assert_eq!(second.label, Some(7), "label attached");

        let first = corpus.read(0).unwrap();
        assert_eq!(first.pixels, [0, 1, 2, 3, 4, 5], "reads seek backwards");

        assert!(matches!(corpus.read(2), Err(Error::Corpus(_))), "out of range index");

        fs::remove_file(images).unwrap();
        fs::remove_file(labels).unwrap();
    }

    #[test]
    fn rejects_bad_files() {
        let images = temp_path("bad-images.idx3");
        let labels = temp_path("short-labels.idx1");
        write_images(&images, &[[0; 6], [0; 6]]);
        write_labels(&labels, &[1]);

        assert!(
            matches!(IdxCorpus::open(&images, Some(labels.as_path())), Err(Error::Corpus(_))),
            "label count must match image count"
        );
        assert!(
            matches!(IdxCorpus::open(&labels, None), Err(Error::Corpus(_))),
            "label file is not an image file"
        );
        assert!(
            matches!(IdxCorpus::open(temp_path("missing"), None), Err(Error::Io(_))),
            "missing file surfaces io error"
        );

        fs::remove_file(images).unwrap();
        fs::remove_file(labels).unwrap();
    }

    #[test]
    fn rejects_headers_larger_than_file() {
        let images = temp_path("truncated-images.idx3");
        let labels = temp_path("huge-labels.idx1");
        write_images(&images, &[[0; 6], [0; 6]]);
        let mut bytes = fs::read(&images).unwrap();
        bytes.truncate(bytes.len() - 1);
        fs::write(&images, bytes).unwrap();

        let mut header = Vec::new();
        for v in [LABEL_MAGIC, u32::MAX] {
            header.extend(v.to_be_bytes());
        }
        header.extend([1, 2]);
        fs::write(&labels, header).unwrap();

        assert!(
            matches!(IdxCorpus::open(&images, None), Err(Error::Corpus(_))),
            "truncated image file"
        );
        assert!(
            matches!(read_labels(&labels), Err(Error::Corpus(_))),
            "label count is checked before allocating"
        );

        fs::remove_file(images).unwrap();
        fs::remove_file(labels).unwrap();
    }
}
