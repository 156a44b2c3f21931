//! A grid environment in which an agent learns to write by copying binary patterns.
//!
//! Each episode draws a reference pattern from a [`PatternSource`](pattern::PatternSource).
//! The agent starts in the top-left corner of an empty work grid. It moves a cursor and
//! fills cells, then quits. Quitting pays off only if the work grid exactly matches the
//! reference.

/// Environment core
pub mod env;

/// Binary grids
pub mod grid;

/// Edge-triggered keyboard state
pub mod input;

/// Reference pattern generators
pub mod pattern;

/// Text and pixel rendering
pub mod render;

/// Conversions to burn tensors
pub mod traits;

/// Miscellaneous helpers
pub mod util;

/// Terminal viewer
#[cfg(feature = "viz")]
pub mod viz;

mod error;

pub use error::{Error, Result};
