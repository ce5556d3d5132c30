//! Domain types shared by every folio crate.
//!
//! Source and destination locations are carried as owned `PathBuf`s so a
//! [`RunOptions`] can move into a blocking build task.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the reserved fragments directory.
pub const FRAGMENTS_DIR: &str = "_partials";

/// Name of the ignore file read from the source root.
pub const IGNORE_FILE: &str = ".folioignore";

// ---------------------------------------------------------------------------
// FileKind
// ---------------------------------------------------------------------------

/// Bucket a collected file falls into, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `.yaml` / `.yml` directory configuration.
    Config,
    /// `.html` / `.htm`, expanded through the template engine.
    Markup,
    /// `.md` / `.markdown`, handed to the document converter.
    Markdown,
    /// `.ipynb`, handed to the notebook converter.
    Notebook,
    /// Anything else; copied verbatim.
    Other,
}

impl FileKind {
    /// All kinds in bucket order.
    pub fn all() -> &'static [FileKind] {
        &[
            FileKind::Config,
            FileKind::Markup,
            FileKind::Markdown,
            FileKind::Notebook,
            FileKind::Other,
        ]
    }

    /// Classify a file name by its (case-insensitive) extension.
    pub fn classify(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => FileKind::Config,
            Some("html" | "htm") => FileKind::Markup,
            Some("md" | "markdown") => FileKind::Markdown,
            Some("ipynb") => FileKind::Notebook,
            _ => FileKind::Other,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Config => write!(f, "config"),
            FileKind::Markup => write!(f, "markup"),
            FileKind::Markdown => write!(f, "markdown"),
            FileKind::Notebook => write!(f, "notebook"),
            FileKind::Other => write!(f, "other"),
        }
    }
}

// ---------------------------------------------------------------------------
// RunOptions
// ---------------------------------------------------------------------------

/// Per-run settings threaded explicitly through a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Source tree root.
    pub source: PathBuf,
    /// Destination tree root; must differ from `source`.
    pub destination: PathBuf,
    /// Disable mtime-based staleness checks.
    pub ignore_times: bool,
    /// Copy verbatim files even when size and mtime already match.
    pub force_copy: bool,
    /// Clock reading used for every availability decision in this run.
    pub now: DateTime<Utc>,
}

impl RunOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ignore_times: false,
            force_copy: false,
            now: Utc::now(),
        }
    }

    pub fn ignore_times(mut self, yes: bool) -> Self {
        self.ignore_times = yes;
        self
    }

    pub fn force_copy(mut self, yes: bool) -> Self {
        self.force_copy = yes;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("site.yaml", FileKind::Config)]
    #[case("site.YML", FileKind::Config)]
    #[case("index.html", FileKind::Markup)]
    #[case("old.HTM", FileKind::Markup)]
    #[case("post.md", FileKind::Markdown)]
    #[case("post.markdown", FileKind::Markdown)]
    #[case("lab.ipynb", FileKind::Notebook)]
    #[case("logo.png", FileKind::Other)]
    #[case("Makefile", FileKind::Other)]
    fn classify_by_extension(#[case] name: &str, #[case] expected: FileKind) {
        assert_eq!(FileKind::classify(name), expected);
    }

    #[test]
    fn run_options_builders() {
        let opts = RunOptions::new("/src", "/out")
            .ignore_times(true)
            .force_copy(true);
        assert!(opts.ignore_times);
        assert!(opts.force_copy);
        assert_eq!(opts.source, PathBuf::from("/src"));
    }

    #[test]
    fn file_kind_display() {
        assert_eq!(FileKind::Markdown.to_string(), "markdown");
        assert_eq!(FileKind::Other.to_string(), "other");
    }
}
