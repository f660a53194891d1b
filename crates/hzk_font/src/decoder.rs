//! Packed HZK stream → atlas images.
//!
//! The format has no length fields, so the only integrity check available is
//! that every level gets exactly the number of bytes the encoder produces.

use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
};

use crate::{code_point, Glyph, GlyphAtlas, HzkError, HzkFont, Level, RenderOptions, Result, LEVELS};

/// Summary of a finished decode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub bytes_read: u64,
    /// Bytes following the last level, ignored.
    pub trailing_bytes: u64,
    pub images: Vec<PathBuf>,
}

/// Reads levels from a packed HZK stream.
pub struct HzkDecoder<R: Read> {
    reader: R,
    next_level: usize,
    bytes_read: u64,
}

impl<R: Read> HzkDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_level: 0,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next level, which has to be `level`.
    pub fn read_level(&mut self, level: Level) -> Result<GlyphAtlas> {
        if level.ordinal() != self.next_level {
            return Err(HzkError::LevelOrder {
                expected: self.next_level,
                actual: level.ordinal(),
            });
        }

        let expected = level.encoded_len();
        let mut data = vec![0; expected];
        let available = read_full(&mut self.reader, &mut data)?;
        self.bytes_read += available as u64;
        if available < expected {
            return Err(HzkError::Truncated {
                level: level.ordinal(),
                expected,
                available,
            });
        }

        let mut atlas = GlyphAtlas::blank(level);
        let glyph_len = level.bytes_per_glyph();
        for ((col, row), chunk) in level.slots().zip(data.chunks_exact(glyph_len)) {
            atlas.glyphs[code_point(col, row)] = Glyph::from_packed_rows(level.bits_per_row() as u8, level.rows_per_glyph() as u8, chunk);
        }
        log::debug!("Decoded level {level}: {expected} bytes");

        self.next_level += 1;
        Ok(atlas)
    }

    /// Read all remaining levels into a font.
    pub fn read_font(&mut self) -> Result<HzkFont> {
        let mut atlases = Vec::with_capacity(LEVELS.len());
        for level in &LEVELS[self.next_level..] {
            atlases.push(self.read_level(*level)?);
        }
        Ok(HzkFont { atlases })
    }

    /// Count and drop whatever follows the last level.
    pub fn skip_trailing(&mut self) -> Result<u64> {
        let trailing = std::io::copy(&mut self.reader, &mut std::io::sink())?;
        if trailing > 0 {
            log::warn!("Ignoring {trailing} bytes after the last level");
        }
        Ok(trailing)
    }
}

/// Like `read_exact`, but reports how much could be read instead of failing.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Decode a complete HZK file held in memory.
pub fn decode_bytes(data: &[u8]) -> Result<HzkFont> {
    HzkDecoder::new(data).read_font()
}

/// Decode the HZK file `input` into one atlas image per level inside `output_dir`.
pub fn decode_file(input: &Path, output_dir: &Path, options: &RenderOptions) -> Result<DecodeReport> {
    let file = File::open(input).map_err(|e| HzkError::open_file(input, e))?;
    let mut decoder = HzkDecoder::new(BufReader::new(file));
    let font = decoder.read_font()?;
    let trailing_bytes = decoder.skip_trailing()?;
    let bytes_read = decoder.bytes_read();

    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| HzkError::not_writable(output_dir, e))?;
    }
    let images = font.save_atlas_dir(output_dir, options)?;

    Ok(DecodeReport {
        bytes_read,
        trailing_bytes,
        images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::total_encoded_len;

    #[test]
    fn test_decode_blank() {
        let data = vec![0; total_encoded_len()];
        let font = decode_bytes(&data).unwrap();
        assert_eq!(font.atlases.len(), 10);
        assert!(font.atlases.iter().all(|a| a.glyphs.iter().all(Glyph::is_empty)));
    }

    #[test]
    fn test_truncated_names_level() {
        let data = vec![0; LEVELS[3].offset() + 5];
        let err = decode_bytes(&data).unwrap_err();
        match err {
            HzkError::Truncated { level, expected, available } => {
                assert_eq!(level, 3);
                assert_eq!(expected, LEVELS[3].encoded_len());
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let err = decode_bytes(&[]).unwrap_err();
        assert_eq!(err.level(), Some(0));
    }

    #[test]
    fn test_one_byte_short() {
        let data = vec![0; total_encoded_len() - 1];
        let err = decode_bytes(&data).unwrap_err();
        assert_eq!(err.level(), Some(9));
    }

    #[test]
    fn test_first_row_of_first_glyph() {
        let mut data = vec![0; total_encoded_len()];
        data[0] = 0xF8;
        let font = decode_bytes(&data).unwrap();
        let glyph = font.glyph(0, 0).unwrap();
        assert!(glyph.row_bits(0).all(|b| b));
        assert!(glyph.row_bits(1).all(|b| !b));
    }

    #[test]
    fn test_trailing_bytes() {
        let data = vec![0; total_encoded_len() + 3];
        let mut decoder = HzkDecoder::new(&data[..]);
        decoder.read_font().unwrap();
        assert_eq!(decoder.skip_trailing().unwrap(), 3);
        assert_eq!(decoder.bytes_read() as usize, total_encoded_len());
    }
}
