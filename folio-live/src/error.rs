use std::path::PathBuf;

use thiserror::Error;

/// Error surface for live mode: watcher, command input and hooks.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Build(#[from] folio_build::BuildError),

    #[error(transparent)]
    Core(#[from] folio_core::CoreError),

    #[error("{task} task failed: {message}")]
    Task { task: &'static str, message: String },

    #[error("unknown command {0:?} (h for help)")]
    UnknownCommand(String),

    #[error("upload hook {program} exited with {status}")]
    Hook { program: PathBuf, status: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LiveError {
    LiveError::Io {
        path: path.into(),
        source,
    }
}
