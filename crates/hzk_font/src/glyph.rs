//! Packed bitmap of the drawable block of one atlas cell.

use crate::{bits, Level};

/// Maximum number of rows a glyph can hold (63 are used by the 32x64 level).
pub const MAX_GLYPH_HEIGHT: usize = 64;

/// Maximum number of pixels per glyph row (31 are used by the 32x64 level).
pub const MAX_GLYPH_WIDTH: usize = 32;

/// The sampled pixels of one glyph.
///
/// Each row is stored as one `u32` with MSB-first bit ordering:
/// - Bit 31 = leftmost pixel
/// - Bit 32 - width = rightmost pixel
///
/// A set bit is a black (foreground) pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Bitmap data: one word per row, MSB = leftmost pixel
    pub data: [u32; MAX_GLYPH_HEIGHT],
    /// Glyph width in pixels (1-32)
    pub width: u8,
    /// Glyph height in pixels (1-64)
    pub height: u8,
}

impl Glyph {
    /// Create a new glyph with the given dimensions.
    /// All pixels are initially off. Dimensions are clamped to
    /// `MAX_GLYPH_WIDTH` x `MAX_GLYPH_HEIGHT`.
    #[inline]
    pub const fn new(width: u8, height: u8) -> Self {
        let width = if width as usize > MAX_GLYPH_WIDTH { MAX_GLYPH_WIDTH as u8 } else { width };
        let height = if height as usize > MAX_GLYPH_HEIGHT { MAX_GLYPH_HEIGHT as u8 } else { height };
        Self {
            data: [0; MAX_GLYPH_HEIGHT],
            width,
            height,
        }
    }

    /// A blank glyph sized for the drawable block of `level`.
    pub fn for_level(level: Level) -> Self {
        Self::new(level.bits_per_row() as u8, level.rows_per_glyph() as u8)
    }

    /// Get a pixel value at the given position.
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width as usize || y >= self.height as usize {
            return false;
        }
        (self.data[y] & (0x8000_0000 >> x)) != 0
    }

    /// Set a pixel value at the given position.
    ///
    /// Does nothing if coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width as usize || y >= self.height as usize {
            return;
        }
        let mask = 0x8000_0000 >> x;
        if value {
            self.data[y] |= mask;
        } else {
            self.data[y] &= !mask;
        }
    }

    /// Pixels of row `y`, left to right.
    pub fn row_bits(&self, y: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.width as usize).map(move |x| self.get_pixel(x, y))
    }

    /// Bit run of row `y` as it appears in the packed file.
    pub fn pack_row(&self, y: usize) -> Vec<u8> {
        let bits: Vec<bool> = self.row_bits(y).collect();
        bits::pack_bits(&bits)
    }

    /// Rebuild a glyph from its packed rows, `width.div_ceil(8)` bytes per row.
    pub fn from_packed_rows(width: u8, height: u8, data: &[u8]) -> Self {
        let mut glyph = Self::new(width, height);
        let row_len = (width as usize).div_ceil(8);
        if row_len == 0 {
            return glyph;
        }
        for (y, row) in data.chunks(row_len).take(height as usize).enumerate() {
            for (x, bit) in bits::unpack_bits(row, width as usize).into_iter().enumerate() {
                glyph.set_pixel(x, y, bit);
            }
        }
        glyph
    }

    /// Check if the glyph is empty (all pixels off).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data[..self.height as usize].iter().all(|&w| w == 0)
    }
}
