//! Frame file discovery for animation collections.
//!
//! Frames are numbered SVG files (`1.svg`, `2.svg`, ... `10.svg`); plain
//! lexicographic order would play frame 10 after frame 1, so listing sorts
//! by numeric stem first and falls back to name order for anything
//! non-numeric.

use std::io;
use std::path::{Path, PathBuf};

use glob::glob;

/// List the `.svg` frame files directly inside `dir`, as file names relative
/// to `dir`, in animation order.
pub fn list_frames(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        ));
    }

    let pattern = format!("{}/*.svg", dir.display());
    let mut frames: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| path.file_name().map(PathBuf::from))
            .collect(),
        Err(_) => Vec::new(),
    };

    // Numeric stems in numeric order, then everything else in name order
    frames.sort_by_key(|path| (numeric_stem(path).unwrap_or(u64::MAX), path.clone()));
    Ok(frames)
}

fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}
