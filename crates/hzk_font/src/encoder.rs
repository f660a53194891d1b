//! Atlas images → packed HZK stream.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::RgbaImage;

use crate::{atlas, bits, code_point, AtlasView, GlyphAtlas, HzkError, Level, Result, GLYPHS_PER_LEVEL, LEVELS};

/// Summary of a finished encode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub bytes_written: u64,
    pub levels: usize,
}

/// Streaming HZK writer.
///
/// Levels have to be fed in ascending order, each glyph row is written as soon
/// as it has been sampled.
pub struct HzkEncoder<W: Write> {
    writer: W,
    next_level: usize,
    bytes_written: u64,
    row_bits: Vec<bool>,
    row_bytes: Vec<u8>,
}

impl<W: Write> HzkEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_level: 0,
            bytes_written: 0,
            row_bits: Vec::with_capacity(32),
            row_bytes: Vec::with_capacity(4),
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of levels written so far.
    pub fn levels_written(&self) -> usize {
        self.next_level
    }

    pub fn is_complete(&self) -> bool {
        self.next_level == LEVELS.len()
    }

    fn expect_level(&self, level: Level) -> Result<()> {
        if level.ordinal() != self.next_level {
            return Err(HzkError::LevelOrder {
                expected: self.next_level,
                actual: level.ordinal(),
            });
        }
        Ok(())
    }

    fn write_run(&mut self) -> Result<()> {
        self.row_bytes.clear();
        bits::pack_bits_into(&self.row_bits, &mut self.row_bytes);
        self.writer.write_all(&self.row_bytes)?;
        self.bytes_written += self.row_bytes.len() as u64;
        Ok(())
    }

    /// Sample and write one level straight from its atlas image.
    pub fn encode_image(&mut self, level: Level, image: &RgbaImage, path: &Path) -> Result<()> {
        self.expect_level(level)?;
        let view = AtlasView::new(level, image, path)?;
        for (col, row) in level.slots() {
            for y in 0..level.rows_per_glyph() {
                view.sample_row(col, row, y, &mut self.row_bits)?;
                self.write_run()?;
            }
        }
        self.next_level += 1;
        Ok(())
    }

    /// Write one level from an in-memory atlas.
    ///
    /// The atlas must hold all 128 glyphs sized for its level, otherwise
    /// nothing is written.
    pub fn encode_atlas(&mut self, atlas: &GlyphAtlas) -> Result<()> {
        let level = atlas.level;
        self.expect_level(level)?;
        check_glyphs(atlas)?;
        for (col, row) in level.slots() {
            let glyph = &atlas.glyphs[code_point(col, row)];
            for y in 0..level.rows_per_glyph() {
                self.row_bits.clear();
                self.row_bits.extend(glyph.row_bits(y));
                self.write_run()?;
            }
        }
        self.next_level += 1;
        Ok(())
    }

    /// Flush and hand back the writer together with the number of bytes written.
    pub fn finish(mut self) -> Result<(W, u64)> {
        self.writer.flush()?;
        Ok((self.writer, self.bytes_written))
    }
}

fn check_glyphs(atlas: &GlyphAtlas) -> Result<()> {
    let level = atlas.level;
    if atlas.glyphs.len() != GLYPHS_PER_LEVEL {
        return Err(HzkError::GlyphCount {
            level: level.ordinal(),
            expected: GLYPHS_PER_LEVEL,
            actual: atlas.glyphs.len(),
        });
    }
    let expected = (level.bits_per_row(), level.rows_per_glyph());
    for (col, row) in level.slots() {
        let code = code_point(col, row);
        let glyph = &atlas.glyphs[code];
        let actual = (glyph.width as usize, glyph.height as usize);
        if actual != expected {
            return Err(HzkError::GlyphSize {
                level: level.ordinal(),
                code,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

/// Check that `dir` holds a correctly sized atlas for every level.
///
/// Reads only the image headers, so a bad input is rejected before any
/// output is produced.
pub fn check_atlas_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(HzkError::open_file(dir, "not a directory"));
    }
    for level in LEVELS {
        let path = GlyphAtlas::path_in(level, dir);
        if !path.is_file() {
            return Err(HzkError::MissingAtlas {
                level: level.ordinal(),
                path,
            });
        }
        let dimensions = image::image_dimensions(&path).map_err(|e| HzkError::open_file(&path, e))?;
        atlas::check_dimensions(level, &path, dimensions)?;
    }
    Ok(())
}

fn encode_levels<W: Write>(input_dir: &Path, writer: W) -> Result<(W, EncodeReport)> {
    let mut encoder = HzkEncoder::new(writer);
    for level in LEVELS {
        let path = GlyphAtlas::path_in(level, input_dir);
        log::info!("Processing image: {}", path.display());
        let image = atlas::load_image(level, &path)?;
        encoder.encode_image(level, &image, &path)?;
        log::info!("Completed handling file: {}", path.display());
    }
    let levels = encoder.levels_written();
    let (writer, bytes_written) = encoder.finish()?;
    Ok((writer, EncodeReport { bytes_written, levels }))
}

/// Encode the atlas directory `input_dir` into `writer`.
pub fn encode_to_writer<W: Write>(input_dir: &Path, writer: W) -> Result<EncodeReport> {
    check_atlas_dir(input_dir)?;
    let (_, report) = encode_levels(input_dir, writer)?;
    Ok(report)
}

/// Temporary file the encoder writes to before renaming it into place.
pub fn partial_path(output: &Path) -> Result<PathBuf> {
    let Some(name) = output.file_name() else {
        return Err(HzkError::not_writable(output, "not a file path"));
    };
    Ok(output.with_file_name(format!(".{}.partial", name.to_string_lossy())))
}

/// Encode the atlas directory `input_dir` into the HZK file `output`.
///
/// The file only appears once it is complete; on error nothing is left behind
/// and an existing `output` is not touched.
pub fn encode_dir(input_dir: &Path, output: &Path) -> Result<EncodeReport> {
    check_atlas_dir(input_dir)?;

    let partial = partial_path(output)?;
    let file = File::create(&partial).map_err(|e| HzkError::not_writable(&partial, e))?;

    let result = encode_levels(input_dir, BufWriter::new(file)).and_then(|(writer, report)| {
        let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&partial, output)?;
        Ok(report)
    });

    match result {
        Ok(report) => {
            log::info!("Wrote {} bytes to {}", report.bytes_written, output.display());
            Ok(report)
        }
        Err(err) => {
            if let Err(e) = fs::remove_file(&partial) {
                log::warn!("Can't remove partial output {}: {e}", partial.display());
            }
            Err(err)
        }
    }
}
