//! Error types for folio-build.
//!
//! Only run-level failures live here. Per-file problems are contained in the
//! manifest entry and logged; they never surface as a [`BuildError`].

use std::path::PathBuf;

use thiserror::Error;

use folio_core::{CoreError, ScopeError};

#[derive(Debug, Error)]
pub enum BuildError {
    /// Source and destination resolve to the same directory.
    #[error("destination {path} is the source directory")]
    SameRoot { path: PathBuf },

    /// The source root does not exist or is not a directory.
    #[error("source directory {path} does not exist")]
    SourceMissing { path: PathBuf },

    /// The destination root could not be created.
    #[error("cannot create destination {path}: {source}")]
    DestinationRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tree collection or ignore-file failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Scope stack out of balance.
    #[error("scope error: {0}")]
    Scope(#[from] ScopeError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
