//! Error types for the HZK codec

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for HZK encode/decode operations
#[derive(Debug, Error)]
pub enum HzkError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file '{path}': {message}")]
    OpenFile { path: PathBuf, message: String },

    #[error("Path '{path}' is not writable: {message}")]
    NotWritable { path: PathBuf, message: String },

    // === Input shape ===
    #[error("Missing atlas image for level {level}: '{path}'")]
    MissingAtlas { level: usize, path: PathBuf },

    #[error(
        "Incorrect dimensions for image '{path}'. Was: {}x{}. Expected: {}x{}.",
        actual.0,
        actual.1,
        expected.0,
        expected.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Invalid image: '{path}' - pixel ({x}, {y}) contains RGB value: {}, {}, {}", rgb[0], rgb[1], rgb[2])]
    MalformedPixel { path: PathBuf, x: u32, y: u32, rgb: [u8; 3] },

    #[error("Not an atlas image name: '{name}'")]
    UnknownLevel { name: String },

    #[error("Level {level} atlas holds {actual} glyphs, expected {expected}")]
    GlyphCount { level: usize, expected: usize, actual: usize },

    #[error(
        "Glyph {code} of level {level} is {}x{}, expected {}x{}",
        actual.0,
        actual.1,
        expected.0,
        expected.1
    )]
    GlyphSize {
        level: usize,
        code: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Levels must be written in order: expected level {expected}, got level {actual}")]
    LevelOrder { expected: usize, actual: usize },

    // === Decoding ===
    #[error("HZK data truncated in level {level}: needed {expected} bytes, only {available} available")]
    Truncated { level: usize, expected: usize, available: usize },

    // === External Errors ===
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for HZK operations
pub type Result<T> = std::result::Result<T, HzkError>;

impl HzkError {
    /// Create an open file error
    pub fn open_file(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::OpenFile {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Create a not writable error
    pub fn not_writable(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::NotWritable {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// The level the error refers to, if any.
    pub fn level(&self) -> Option<usize> {
        match self {
            Self::MissingAtlas { level, .. }
            | Self::Truncated { level, .. }
            | Self::GlyphCount { level, .. }
            | Self::GlyphSize { level, .. } => Some(*level),
            Self::LevelOrder { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_message_names_both_sizes() {
        let err = HzkError::DimensionMismatch {
            path: PathBuf::from("fonts/0x00_6x12_0-127.png"),
            expected: (113, 105),
            actual: (112, 105),
        };
        let msg = err.to_string();
        assert!(msg.contains("0x00_6x12_0-127.png"));
        assert!(msg.contains("112x105"));
        assert!(msg.contains("113x105"));
    }

    #[test]
    fn test_malformed_pixel_message_names_color() {
        let err = HzkError::MalformedPixel {
            path: PathBuf::from("a.png"),
            x: 3,
            y: 4,
            rgb: [12, 34, 56],
        };
        assert!(err.to_string().contains("12, 34, 56"));
    }

    #[test]
    fn test_level() {
        let err = HzkError::Truncated {
            level: 4,
            expected: 10,
            available: 2,
        };
        assert_eq!(err.level(), Some(4));
        assert_eq!(HzkError::Io(std::io::Error::other("x")).level(), None);
    }
}
