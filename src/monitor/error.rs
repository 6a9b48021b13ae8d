//! Error types for monitored-set persistence.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading or rewriting the monitored list.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Reading, creating, or appending to the list failed.
    #[error("IO error on monitored list {path}: {source}")]
    Io {
        /// The list file (or its parent directory).
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Replacing the list after a sweep failed.
    ///
    /// `pending` holds the identifiers that should have been written so the
    /// caller can report or retry them.
    #[error(
        "failed to rewrite monitored list {path} ({} pending): {source}\n  Suggestion: Check permissions on the state directory",
        pending.len()
    )]
    Rewrite {
        /// The list file being replaced.
        path: PathBuf,
        /// Identifiers still outstanding.
        pending: Vec<String>,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Identifier was empty after trimming.
    #[error("identifier is empty\n  Suggestion: Pass a DOI such as 10.1000/xyz123")]
    EmptyIdentifier,
}

impl MonitorError {
    /// Creates an IO error for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a rewrite error carrying the pending identifiers.
    pub fn rewrite(path: &Path, pending: Vec<String>, source: std::io::Error) -> Self {
        Self::Rewrite {
            path: path.to_path_buf(),
            pending,
            source,
        }
    }

    /// Pending identifiers preserved by a failed rewrite.
    #[must_use]
    pub fn pending(&self) -> Option<&[String]> {
        match self {
            Self::Rewrite { pending, .. } => Some(pending),
            Self::Io { .. } | Self::EmptyIdentifier => None,
        }
    }
}
