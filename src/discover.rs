//! Locating `.eaf` files on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Find all `.eaf` files under `root`.
///
/// A directory is walked recursively; a plain file is passed through
/// unchanged so callers can treat "one file" and "a corpus tree" the same
/// way. Matching is case-insensitive on the extension. Results are sorted
/// so conversion order (and therefore anonymization draws) is stable for a
/// given tree.
pub fn find_eaf_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry
            .map_err(|err| Error::msg(format!("failed to walk {}: {err}", root.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_eaf = entry
            .path()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("eaf"))
            .unwrap_or(false);
        if is_eaf {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    Ok(matches)
}
