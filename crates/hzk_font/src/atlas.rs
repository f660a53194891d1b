//! Glyph atlas images.
//!
//! An atlas holds the 128 cells of one level in a 16x8 grid. Every cell is
//! `(width + 1) x (height + 1)` pixels including a one pixel separator on its
//! top and left edge, and the whole grid is closed by a final separator on
//! the right and bottom:
//!
//! ```text
//!  +------+------+--
//!  |......|......|
//!  |..##..|.###..|     '+', '-', '|' separator
//!  |.#..#.|.#..#.|     '#', '.'      sampled pixels
//!  |.####.|.###..|
//!  ...
//! ```
//!
//! Only pixels `1..width` and rows `1..height` of a cell are sampled, so the last
//! column and row inside each cell never reach the packed file.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::{code_point, Glyph, HzkError, Level, Result, GLYPHS_PER_LEVEL, GRID_COLUMNS, GRID_ROWS};

pub const BLACK: [u8; 3] = [0, 0, 0];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Colors used when drawing an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Separator lines between cells, never sampled by the encoder.
    pub grid_color: [u8; 3],
    /// Set pixels. Must stay black for the image to be encodable.
    pub foreground: [u8; 3],
    /// Clear pixels. Must stay white for the image to be encodable.
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grid_color: [128, 128, 128],
            foreground: BLACK,
            background: WHITE,
        }
    }
}

/// Top left corner (on the separator) of cell `(col, row)`.
#[inline]
pub fn cell_origin(level: Level, col: u32, row: u32) -> (u32, u32) {
    (col * (level.width() + 1), row * (level.height() + 1))
}

/// Black is a set bit, white a clear one, anything else is rejected.
pub fn classify_pixel(pixel: &Rgba<u8>, path: &Path, x: u32, y: u32) -> Result<bool> {
    let rgb = [pixel[0], pixel[1], pixel[2]];
    match rgb {
        BLACK => Ok(true),
        WHITE => Ok(false),
        _ => Err(HzkError::MalformedPixel {
            path: path.to_path_buf(),
            x,
            y,
            rgb,
        }),
    }
}

/// Read an image from disk, converting it to RGBA.
pub fn load_image(level: Level, path: &Path) -> Result<RgbaImage> {
    if !path.is_file() {
        return Err(HzkError::MissingAtlas {
            level: level.ordinal(),
            path: path.to_path_buf(),
        });
    }
    let img = image::open(path).map_err(|e| HzkError::open_file(path, e))?;
    Ok(img.to_rgba8())
}

/// Fail unless `actual` is the exact atlas size of `level`.
pub fn check_dimensions(level: Level, path: &Path, actual: (u32, u32)) -> Result<()> {
    let expected = level.atlas_dimensions();
    if actual != expected {
        return Err(HzkError::DimensionMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// A dimension checked atlas image that can be sampled glyph row by glyph row.
pub struct AtlasView<'a> {
    level: Level,
    image: &'a RgbaImage,
    path: &'a Path,
}

impl<'a> AtlasView<'a> {
    pub fn new(level: Level, image: &'a RgbaImage, path: &'a Path) -> Result<Self> {
        check_dimensions(level, path, image.dimensions())?;
        Ok(Self { level, image, path })
    }

    /// Classify row `y` (0 based, inside the drawable block) of cell `(col, row)` into `bits`.
    pub fn sample_row(&self, col: u32, row: u32, y: usize, bits: &mut Vec<bool>) -> Result<()> {
        let (ox, oy) = cell_origin(self.level, col, row);
        let py = oy + 1 + y as u32;
        bits.clear();
        for w in 1..self.level.width() {
            let px = ox + w;
            bits.push(classify_pixel(self.image.get_pixel(px, py), self.path, px, py)?);
        }
        Ok(())
    }

    pub fn read_glyph(&self, col: u32, row: u32) -> Result<Glyph> {
        let mut glyph = Glyph::for_level(self.level);
        let mut bits = Vec::with_capacity(self.level.bits_per_row());
        for y in 0..self.level.rows_per_glyph() {
            self.sample_row(col, row, y, &mut bits)?;
            for (x, &bit) in bits.iter().enumerate() {
                glyph.set_pixel(x, y, bit);
            }
        }
        Ok(glyph)
    }
}

/// All glyphs of one level, indexed by code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphAtlas {
    pub level: Level,
    pub glyphs: Vec<Glyph>,
}

impl GlyphAtlas {
    /// An atlas with every glyph clear.
    pub fn blank(level: Level) -> Self {
        Self {
            level,
            glyphs: vec![Glyph::for_level(level); GLYPHS_PER_LEVEL],
        }
    }

    /// Sample every glyph of `image`; the reserved cell is left blank and not read.
    pub fn from_image(level: Level, image: &RgbaImage, path: &Path) -> Result<Self> {
        let view = AtlasView::new(level, image, path)?;
        let mut atlas = Self::blank(level);
        for (col, row) in level.slots() {
            atlas.glyphs[code_point(col, row)] = view.read_glyph(col, row)?;
        }
        Ok(atlas)
    }

    /// Path of this level's atlas inside `dir`.
    pub fn path_in(level: Level, dir: &Path) -> PathBuf {
        dir.join(level.file_name())
    }

    /// Load the atlas of `level` from its canonical file in `dir`.
    pub fn load(dir: &Path, level: Level) -> Result<Self> {
        let path = Self::path_in(level, dir);
        log::info!("Processing image: {}", path.display());
        let image = load_image(level, &path)?;
        Self::from_image(level, &image, &path)
    }

    pub fn glyph(&self, code: usize) -> Option<&Glyph> {
        self.glyphs.get(code)
    }

    pub fn glyph_mut(&mut self, code: usize) -> Option<&mut Glyph> {
        self.glyphs.get_mut(code)
    }

    /// Draw the atlas with separator lines.
    pub fn to_image(&self, options: &RenderOptions) -> RgbaImage {
        let level = self.level;
        let bg = rgba(options.background);
        let grid = rgba(options.grid_color);
        let fg = rgba(options.foreground);

        let mut img = RgbaImage::from_pixel(level.atlas_width(), level.atlas_height(), bg);

        for col in 0..=GRID_COLUMNS {
            let x = col * (level.width() + 1);
            for y in 0..img.height() {
                img.put_pixel(x, y, grid);
            }
        }
        for row in 0..=GRID_ROWS {
            let y = row * (level.height() + 1);
            for x in 0..img.width() {
                img.put_pixel(x, y, grid);
            }
        }

        for (col, row) in level.slots() {
            let glyph = &self.glyphs[code_point(col, row)];
            let (ox, oy) = cell_origin(level, col, row);
            for y in 0..glyph.height as usize {
                for x in 0..glyph.width as usize {
                    if glyph.get_pixel(x, y) {
                        img.put_pixel(ox + 1 + x as u32, oy + 1 + y as u32, fg);
                    }
                }
            }
        }
        img
    }

    /// Write the atlas as a PNG with its canonical name into `dir`.
    pub fn save(&self, dir: &Path, options: &RenderOptions) -> Result<PathBuf> {
        let path = Self::path_in(self.level, dir);
        self.to_image(options).save_with_format(&path, image::ImageFormat::Png)?;
        log::info!("Wrote image: {}", path.display());
        Ok(path)
    }
}

fn rgba(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LEVELS;

    fn path() -> &'static Path {
        Path::new("test.png")
    }

    #[test]
    fn test_classify_pixel() {
        assert!(classify_pixel(&Rgba([0, 0, 0, 255]), path(), 0, 0).unwrap());
        assert!(!classify_pixel(&Rgba([255, 255, 255, 255]), path(), 0, 0).unwrap());
        // alpha is ignored
        assert!(classify_pixel(&Rgba([0, 0, 0, 0]), path(), 0, 0).unwrap());
        let err = classify_pixel(&Rgba([254, 255, 255, 255]), path(), 7, 9).unwrap_err();
        assert!(matches!(err, HzkError::MalformedPixel { x: 7, y: 9, rgb: [254, 255, 255], .. }));
    }

    #[test]
    fn test_cell_origin() {
        assert_eq!(cell_origin(LEVELS[0], 0, 0), (0, 0));
        assert_eq!(cell_origin(LEVELS[0], 1, 1), (7, 13));
        assert_eq!(cell_origin(LEVELS[0], 15, 7), (105, 91));
    }

    #[test]
    fn test_blank_image_layout() {
        let level = LEVELS[0];
        let img = GlyphAtlas::blank(level).to_image(&RenderOptions::default());
        assert_eq!(img.dimensions(), level.atlas_dimensions());
        assert_eq!(img.get_pixel(0, 5), &Rgba([128, 128, 128, 255]));
        assert_eq!(img.get_pixel(7, 5), &Rgba([128, 128, 128, 255]));
        assert_eq!(img.get_pixel(112, 104), &Rgba([128, 128, 128, 255]));
        assert_eq!(img.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_image_round_trip() {
        let level = LEVELS[2];
        let mut atlas = GlyphAtlas::blank(level);
        let glyph = atlas.glyph_mut(b'A' as usize).unwrap();
        glyph.set_pixel(0, 0, true);
        glyph.set_pixel(8, 18, true);
        glyph.set_pixel(4, 9, true);

        let img = atlas.to_image(&RenderOptions::default());
        let decoded = GlyphAtlas::from_image(level, &img, path()).unwrap();
        assert_eq!(decoded, atlas);
    }

    #[test]
    fn test_pixel_position_in_image() {
        let level = LEVELS[0];
        let mut atlas = GlyphAtlas::blank(level);
        atlas.glyph_mut(17).unwrap().set_pixel(0, 0, true);
        let img = atlas.to_image(&RenderOptions::default());
        // cell (1, 1) starts at (7, 13), drawable block one pixel in
        assert_eq!(img.get_pixel(8, 14), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_unsampled_edge_is_ignored() {
        let level = LEVELS[0];
        let mut img = GlyphAtlas::blank(level).to_image(&RenderOptions::default());
        // last column (w == width) and last row (h == height) of cell (0, 0)
        img.put_pixel(6, 3, Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 12, Rgba([10, 20, 30, 255]));
        assert!(GlyphAtlas::from_image(level, &img, path()).is_ok());
    }

    #[test]
    fn test_dimension_check() {
        let level = LEVELS[1];
        let img = RgbaImage::from_pixel(level.atlas_width() + 1, level.atlas_height(), Rgba([255; 4]));
        let err = GlyphAtlas::from_image(level, &img, path()).unwrap_err();
        assert!(matches!(err, HzkError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_reserved_cell_not_read() {
        let level = LEVELS[9];
        let mut img = GlyphAtlas::blank(level).to_image(&RenderOptions::default());
        let (ox, oy) = cell_origin(level, 15, 7);
        img.put_pixel(ox + 1, oy + 1, Rgba([1, 2, 3, 255]));
        let atlas = GlyphAtlas::from_image(level, &img, path()).unwrap();
        assert!(atlas.glyph(127).unwrap().is_empty());
    }
}
