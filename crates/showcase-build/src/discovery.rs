//! Project discovery.

use std::fs;
use std::path::Path;

use crate::error::BuildError;

/// List the project directories directly under `root`.
///
/// Skips names in `ignore` and hidden names (leading `.`). Symlinks to
/// directories count as directories. The result is sorted so that build
/// order and the generated index are stable across filesystems.
pub fn discover_projects(root: &Path, ignore: &[String]) -> Result<Vec<String>, BuildError> {
    let entries = fs::read_dir(root).map_err(|e| BuildError::Discovery {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut projects = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Discovery {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(
                "Skipping non UTF-8 directory name: {}",
                entry.path().display()
            );
            continue;
        };

        if name.starts_with('.') || ignore.iter().any(|i| i == &name) {
            continue;
        }

        // fs::metadata follows symlinks, entry.file_type() does not
        let is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }

        projects.push(name);
    }

    projects.sort();

    Ok(projects)
}
