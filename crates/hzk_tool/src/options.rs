use hzk_font::RenderOptions;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const OPTIONS_FILE: &str = "options.toml";

/// User settings, read from `options.toml` in the configuration directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    /// Separator color of atlas images written by `decode` and `template`.
    pub grid_color: [u8; 3],

    /// Default log filter, overridden by `RUST_LOG`.
    pub log_spec: String,

    /// Require the `.hzk` extension on font files.
    pub strict_extensions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grid_color: RenderOptions::default().grid_color,
            log_spec: "info".to_string(),
            strict_extensions: true,
        }
    }
}

impl Options {
    pub fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "GitHub", "hzk_tool")
    }

    pub fn default_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(OPTIONS_FILE))
    }

    /// Load options from `path`, or from the default location if `path` is `None`.
    ///
    /// A missing default file is not an error, a missing explicit one is.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_file() {
                Some(file) if file.exists() => file,
                _ => return Ok(Self::default()),
            },
        };
        let txt = fs::read_to_string(&file).with_context(|| format!("Can't read options file {}", file.display()))?;
        Self::from_toml(&txt).with_context(|| format!("Invalid options file {}", file.display()))
    }

    pub fn from_toml(txt: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(txt)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            grid_color: self.grid_color,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Options::from_toml("").unwrap(), Options::default());
    }

    #[test]
    fn test_partial_file() {
        let options = Options::from_toml("grid_color = [255, 0, 0]\n").unwrap();
        assert_eq!(options.grid_color, [255, 0, 0]);
        assert_eq!(options.log_spec, "info");
        assert!(options.strict_extensions);
        assert_eq!(options.render_options().grid_color, [255, 0, 0]);
        assert_eq!(options.render_options().foreground, hzk_font::BLACK);
    }

    #[test]
    fn test_invalid_file() {
        assert!(Options::from_toml("grid_color = \"grey\"").is_err());
    }

    #[test]
    fn test_round_trip() {
        let options = Options {
            grid_color: [1, 2, 3],
            log_spec: "debug".to_string(),
            strict_extensions: false,
        };
        let txt = toml::to_string(&options).unwrap();
        assert_eq!(Options::from_toml(&txt).unwrap(), options);
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(Options::load(Some(Path::new("/nonexistent/hzk_tool/options.toml"))).is_err());
    }
}
