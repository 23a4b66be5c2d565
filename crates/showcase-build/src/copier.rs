//! Recursive directory copy.

use std::fs;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::BuildError;

/// Counts of what a copy wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Files copied
    pub files: usize,

    /// Directories created, including the destination root
    pub dirs: usize,
}

/// Copy the tree at `src` into `dest`, creating `dest` if needed.
///
/// Any directory named in `skip_dirs` is left out at every depth, along with
/// everything beneath it. Files are copied byte for byte. The first I/O error
/// aborts the copy.
pub fn copy_tree(src: &Path, dest: &Path, skip_dirs: &[String]) -> Result<CopyStats, BuildError> {
    let mut stats = CopyStats::default();

    let walker = WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry, skip_dirs));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BuildError::copy(path, e)
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::copy(entry.path(), e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::copy(&target, e))?;
            stats.dirs += 1;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::copy(entry.path(), e))?;
            stats.files += 1;
        }
    }

    tracing::debug!(
        "Copied {} files in {} directories from {}",
        stats.files,
        stats.dirs,
        src.display()
    );

    Ok(stats)
}

fn is_skipped(entry: &DirEntry, skip_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    let skipped = skip_dirs.iter().any(|s| s.as_str() == name.as_ref());
    if skipped {
        tracing::debug!("Skipping {}", entry.path().display());
    }
    skipped
}
