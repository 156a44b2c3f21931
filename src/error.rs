use std::io;

use thiserror::Error;

use crate::env::Phase;

/// Errors surfaced by the environment and its pattern sources
///
/// None of these are recovered from internally; they indicate a driver calling the
/// environment out of order or a pattern source without data.
#[derive(Error, Debug)]
pub enum Error {
    /// An action index outside the six recognized actions
    #[error("unrecognised action: {0}")]
    InvalidAction(usize),

    /// An operation called in a lifecycle phase that does not permit it
    #[error("cannot {op} while the environment is {phase:?}")]
    InvalidState { op: &'static str, phase: Phase },

    /// A pattern source was sampled before any data was available
    #[error("pattern source has no data to sample from")]
    NotReady,

    #[error("unknown pattern set `{0}`")]
    UnknownPatternSet(String),

    /// A corpus file was readable but malformed
    #[error("corpus error: {0}")]
    Corpus(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
