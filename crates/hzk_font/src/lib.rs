#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::return_self_not_must_use
)]
//! Conversion between directories of glyph atlas images and packed HZK font files.
//!
//! An HZK file holds ten resolution levels of the 7-bit ASCII range, each level
//! drawn as a 16x8 grid of cells in a PNG atlas. The file itself has no header:
//! its layout is implied entirely by the fixed level order, see [`LEVELS`].

mod error;
pub use error::*;

mod level;
pub use level::*;

pub mod bits;

mod glyph;
pub use glyph::*;

mod atlas;
pub use atlas::*;

mod encoder;
pub use encoder::*;

mod decoder;
pub use decoder::*;

mod font;
pub use font::*;
