//! Error types for folio-core.

use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while collecting the source tree or reading the ignore file.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pattern in the ignore file is not a valid glob.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Misuse of the scoped context stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `add`, `remove` or `pop` was called with no frame pushed.
    #[error("no open scope frame")]
    NoOpenScope,
}

/// A directory configuration file or front-matter block could not be loaded.
///
/// Always recoverable: callers log it and continue with an empty map.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file it came from.
    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but its top level is not a mapping.
    #[error("YAML in {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// A rejected availability or ignore declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The declaration list itself has the wrong shape.
    #[error("malformed '{key}' declaration: {message}")]
    Malformed { key: &'static str, message: String },

    /// The named target is not a direct child name (contains a separator, `.` or `..`).
    #[error("'{file}' is outside the declaring directory")]
    OutsideDirectory { file: String },

    /// The named target does not exist in the declaring directory.
    #[error("'{file}' does not exist in the declaring directory")]
    UnknownTarget { file: String },

    /// A start/end value is neither a sentinel nor a recognised timestamp.
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    /// The window endpoints are out of order or use a sentinel on the wrong side.
    #[error("ill-formed availability window: start={start}, end={end}")]
    IllFormedWindow { start: String, end: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
