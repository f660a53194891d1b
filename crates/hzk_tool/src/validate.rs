//! Path checks done before handing work to the codec.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid input path: `{}`. Path must be a readable directory with .png files in it.", path.display())]
    InvalidInputDir { path: PathBuf },

    #[error("Invalid output file: `{}`. File must be of type '.hzk' and be writeable by this program.", path.display())]
    InvalidOutputFile { path: PathBuf },

    #[error("Invalid input file: `{}`. File must be of type '.hzk' and be readable by this program.", path.display())]
    InvalidInputFile { path: PathBuf },

    #[error("Invalid output path: `{}`. Path must be a writeable directory.", path.display())]
    InvalidOutputDir { path: PathBuf },
}

pub fn has_hzk_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("hzk"))
}

/// Directory a new file or directory at `path` would be created in.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// True if this process can create files in `path`.
fn is_writable_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let check = path.join(format!(".hzk_tool_write_check_{}", std::process::id()));
    match fs::OpenOptions::new().write(true).create_new(true).open(&check) {
        Ok(file) => {
            drop(file);
            if let Err(err) = fs::remove_file(&check) {
                log::warn!("Can't remove {}: {err}", check.display());
            }
            true
        }
        Err(err) => {
            log::debug!("{} is not writable: {err}", path.display());
            false
        }
    }
}

pub fn check_encode_input(dir: &Path) -> Result<(), ToolError> {
    let invalid = || ToolError::InvalidInputDir { path: dir.to_path_buf() };
    let entries = fs::read_dir(dir).map_err(|_| invalid())?;
    let has_png = entries
        .filter_map(Result::ok)
        .any(|e| e.path().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")));
    if !has_png {
        return Err(invalid());
    }
    log::debug!("{} is valid", dir.display());
    Ok(())
}

pub fn check_encode_output(path: &Path, strict_extensions: bool) -> Result<(), ToolError> {
    let extension_ok = !strict_extensions || has_hzk_extension(path);
    let location_ok = path.is_file() || (!path.exists() && is_writable_dir(parent_dir(path)));
    if !(extension_ok && location_ok) {
        return Err(ToolError::InvalidOutputFile { path: path.to_path_buf() });
    }
    log::debug!("{} is valid", path.display());
    Ok(())
}

pub fn check_decode_input(path: &Path, strict_extensions: bool) -> Result<(), ToolError> {
    let extension_ok = !strict_extensions || has_hzk_extension(path);
    if !(extension_ok && path.is_file()) {
        return Err(ToolError::InvalidInputFile { path: path.to_path_buf() });
    }
    log::debug!("{} is valid", path.display());
    Ok(())
}

pub fn check_output_dir(dir: &Path) -> Result<(), ToolError> {
    let ok = if dir.exists() { is_writable_dir(dir) } else { is_writable_dir(parent_dir(dir)) };
    if !ok {
        return Err(ToolError::InvalidOutputDir { path: dir.to_path_buf() });
    }
    log::debug!("{} is valid", dir.display());
    Ok(())
}
