//! In-memory model of a complete HZK font.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{decoder, Glyph, GlyphAtlas, HzkEncoder, RenderOptions, Result, LEVELS};

/// All ten levels of a font, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HzkFont {
    pub atlases: Vec<GlyphAtlas>,
}

impl Default for HzkFont {
    fn default() -> Self {
        Self::blank()
    }
}

impl HzkFont {
    /// A font with every glyph of every level clear.
    pub fn blank() -> Self {
        Self {
            atlases: LEVELS.iter().map(|l| GlyphAtlas::blank(*l)).collect(),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        decoder::decode_bytes(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut encoder = HzkEncoder::new(Vec::with_capacity(crate::total_encoded_len()));
        for atlas in &self.atlases {
            encoder.encode_atlas(atlas)?;
        }
        let (data, _) = encoder.finish()?;
        Ok(data)
    }

    /// Load every level from `dir`.
    ///
    /// Levels are read in parallel; if several fail, the error of the lowest
    /// level is returned.
    pub fn load_atlas_dir(dir: &Path) -> Result<Self> {
        let results: Vec<Result<GlyphAtlas>> = LEVELS.par_iter().map(|level| GlyphAtlas::load(dir, *level)).collect();
        let atlases = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Self { atlases })
    }

    /// Write one atlas image per level into `dir`, returns the written paths in level order.
    pub fn save_atlas_dir(&self, dir: &Path, options: &RenderOptions) -> Result<Vec<PathBuf>> {
        let results: Vec<Result<PathBuf>> = self.atlases.par_iter().map(|atlas| atlas.save(dir, options)).collect();
        results.into_iter().collect()
    }

    pub fn glyph(&self, level: usize, code: usize) -> Option<&Glyph> {
        self.atlases.get(level)?.glyph(code)
    }

    pub fn glyph_mut(&mut self, level: usize, code: usize) -> Option<&mut Glyph> {
        self.atlases.get_mut(level)?.glyph_mut(code)
    }
}
