//! Build errors.

use std::path::PathBuf;

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read project root {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("Failed to prepare publish directory {path}: {message}")]
    PublishDir { path: PathBuf, message: String },

    #[error("Failed to copy {path}: {message}")]
    Copy { path: PathBuf, message: String },

    #[error("{0}")]
    Command(#[from] crate::runner::RunError),

    #[error("No {candidates} folder found after build")]
    NoOutput { candidates: String },

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write output {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl BuildError {
    pub(crate) fn copy(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Copy {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
