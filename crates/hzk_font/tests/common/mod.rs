#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use hzk_font::{GlyphAtlas, HzkFont, RenderOptions};

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hzk_font_test_{}_{name}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A font with a reproducible pixel pattern in every glyph.
pub fn random_font(seed: u64) -> HzkFont {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut font = HzkFont::blank();
    for atlas in &mut font.atlases {
        let reserved = atlas.level.ordinal() == 9;
        for (code, glyph) in atlas.glyphs.iter_mut().enumerate() {
            if reserved && code == 127 {
                continue;
            }
            for y in 0..glyph.height as usize {
                for x in 0..glyph.width as usize {
                    glyph.set_pixel(x, y, rng.bool());
                }
            }
        }
    }
    font
}

pub fn write_atlas_dir(font: &HzkFont, dir: &Path) {
    for atlas in &font.atlases {
        atlas.save(dir, &RenderOptions::default()).unwrap();
    }
}

pub fn write_blank_dir(dir: &Path) {
    write_atlas_dir(&HzkFont::blank(), dir);
}

pub fn atlas_path(dir: &Path, ordinal: usize) -> PathBuf {
    GlyphAtlas::path_in(hzk_font::LEVELS[ordinal], dir)
}
