//! Path utilities for deriving conversion destinations.
//!
//! A destination is always `<output_dir>/<source stem>.<ext>`; these helpers
//! keep that rule in one place.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Return the final component of `path` with its extension removed.
///
/// Only the last extension is dropped. A name that starts with a dot and has
/// no other dot keeps its full name. A path without a final file name (`/`,
/// `..`) yields an empty string.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use transforge_common::paths::basename_without_extension;
///
/// assert_eq!(basename_without_extension(Path::new("/in/a.mov")), "a");
/// assert_eq!(basename_without_extension(Path::new("clip.final.mkv")), "clip.final");
/// assert_eq!(basename_without_extension(Path::new("noext")), "noext");
/// ```
pub fn basename_without_extension(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the destination path for `source` under `output_dir` with `ext`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use transforge_common::paths::output_path_for;
///
/// let out = output_path_for(Path::new("/in/b.mov"), Path::new("/tmp/out"), "mp4");
/// assert_eq!(out, Path::new("/tmp/out/b.mp4"));
/// ```
#[must_use]
pub fn output_path_for(source: &Path, output_dir: &Path, ext: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", basename_without_extension(source), ext))
}

/// Check that `ext` can be used as an output extension.
///
/// The extension is given without its leading dot and may not contain a path
/// separator.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an empty extension, one with a leading
/// dot, or one containing `/`.
pub fn validate_extension(ext: &str) -> Result<()> {
    if ext.is_empty() {
        return Err(Error::invalid_input("output extension is empty"));
    }
    if ext.starts_with('.') {
        return Err(Error::invalid_input(format!(
            "output extension must not start with a dot: {ext}"
        )));
    }
    if ext.contains('/') || ext.contains(std::path::MAIN_SEPARATOR) {
        return Err(Error::invalid_input(format!(
            "output extension must not contain a path separator: {ext}"
        )));
    }
    Ok(())
}
