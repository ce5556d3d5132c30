//! Error types for folio-render.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a collaborator call can fail. The orchestrator treats all of them
/// as a per-file conversion failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while reading a source or template.
    #[error("render io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Converter {
        program: String,
        status: String,
        stderr: String,
    },

    /// `to:` names a format the document converter does not produce.
    #[error("unsupported output format '{format}'")]
    UnsupportedFormat { format: String },

    /// A front-matter option has the wrong type.
    #[error("invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
