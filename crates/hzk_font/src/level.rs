//! Resolution levels of an HZK font.
//!
//! The packed file is the concatenation of all levels in ascending order, so
//! every size and offset in here is part of the file format.

use crate::{HzkError, Result};

/// Glyph widths of the ten levels, in file order.
pub const PIXEL_WIDTHS: [u32; 10] = [6, 8, 10, 12, 14, 16, 20, 24, 28, 32];

/// Number of glyph columns in an atlas.
pub const GRID_COLUMNS: u32 = 16;

/// Number of glyph rows in an atlas.
pub const GRID_ROWS: u32 = 8;

/// Number of cells in an atlas (code points 0..=127).
pub const GLYPHS_PER_LEVEL: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Code point range encoded in every atlas file name.
pub const CODE_POINT_RANGE: &str = "0-127";

const RESERVED_LEVEL: usize = 9;
const RESERVED_COL: u32 = 15;
const RESERVED_ROW: u32 = 7;

/// One resolution level of the font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level {
    ordinal: usize,
    width: u32,
}

/// All levels in packing order.
pub const LEVELS: [Level; 10] = {
    let mut levels = [Level { ordinal: 0, width: 0 }; 10];
    let mut i = 0;
    while i < levels.len() {
        levels[i] = Level {
            ordinal: i,
            width: PIXEL_WIDTHS[i],
        };
        i += 1;
    }
    levels
};

impl Level {
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        LEVELS.get(ordinal).copied()
    }

    /// Parse a canonical atlas file name such as `0x03_12x24_0-127.png`.
    ///
    /// The ordinal, width and height must all agree with the level table.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let unknown = || HzkError::UnknownLevel { name: name.to_string() };

        let stem = name.strip_suffix(".png").ok_or_else(unknown)?;
        let stem = stem.strip_prefix("0x").ok_or_else(unknown)?;
        let mut parts = stem.split('_');
        let (Some(ordinal), Some(size), Some(range), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(unknown());
        };
        if range != CODE_POINT_RANGE {
            return Err(unknown());
        }
        let ordinal: usize = ordinal.parse().map_err(|_| unknown())?;
        let (width, height) = size.split_once('x').ok_or_else(unknown)?;
        let width: u32 = width.parse().map_err(|_| unknown())?;
        let height: u32 = height.parse().map_err(|_| unknown())?;

        let level = Self::from_ordinal(ordinal).ok_or_else(unknown)?;
        if level.width != width || level.height() != height {
            return Err(unknown());
        }
        Ok(level)
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Glyph cell width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Glyph cell height in pixels, always twice the width.
    pub fn height(&self) -> u32 {
        self.width * 2
    }

    /// Exact width an atlas image of this level must have.
    pub fn atlas_width(&self) -> u32 {
        (self.width + 1) * GRID_COLUMNS + 1
    }

    /// Exact height an atlas image of this level must have.
    pub fn atlas_height(&self) -> u32 {
        (self.height() + 1) * GRID_ROWS + 1
    }

    pub fn atlas_dimensions(&self) -> (u32, u32) {
        (self.atlas_width(), self.atlas_height())
    }

    /// File name of the atlas image for this level.
    ///
    /// The ordinal is printed in decimal after a literal `0x`; this is the
    /// naming used by existing DWIN font tools and must not be "fixed".
    pub fn file_name(&self) -> String {
        format!("0x{:02}_{}x{}_{CODE_POINT_RANGE}.png", self.ordinal, self.width, self.height())
    }

    /// Number of sampled pixels per glyph row.
    pub fn bits_per_row(&self) -> usize {
        (self.width - 1) as usize
    }

    /// Number of sampled rows per glyph.
    pub fn rows_per_glyph(&self) -> usize {
        (self.height() - 1) as usize
    }

    /// Every glyph row is padded to a byte boundary on its own.
    pub fn bytes_per_row(&self) -> usize {
        self.bits_per_row().div_ceil(8)
    }

    pub fn bytes_per_glyph(&self) -> usize {
        self.bytes_per_row() * self.rows_per_glyph()
    }

    /// True for the one cell that is never packed: level 9, row 7, column 15.
    pub fn is_reserved(&self, col: u32, row: u32) -> bool {
        self.ordinal == RESERVED_LEVEL && col == RESERVED_COL && row == RESERVED_ROW
    }

    /// Number of glyphs stored in the file for this level.
    pub fn glyph_count(&self) -> usize {
        if self.ordinal == RESERVED_LEVEL {
            GLYPHS_PER_LEVEL - 1
        } else {
            GLYPHS_PER_LEVEL
        }
    }

    /// Cells in packing order (row-major), reserved cell excluded.
    pub fn slots(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..GRID_ROWS)
            .flat_map(|row| (0..GRID_COLUMNS).map(move |col| (col, row)))
            .filter(move |&(col, row)| !self.is_reserved(col, row))
    }

    /// Bytes this level occupies in the packed file.
    pub fn encoded_len(&self) -> usize {
        self.glyph_count() * self.bytes_per_glyph()
    }

    /// Byte offset of this level inside the packed file.
    pub fn offset(&self) -> usize {
        LEVELS[..self.ordinal].iter().map(Level::encoded_len).sum()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.ordinal, self.width, self.height())
    }
}

/// Code point stored in grid cell `(col, row)`.
#[inline]
pub fn code_point(col: u32, row: u32) -> usize {
    (row * GRID_COLUMNS + col) as usize
}

/// Length of a complete HZK file.
pub fn total_encoded_len() -> usize {
    LEVELS.iter().map(Level::encoded_len).sum()
}
