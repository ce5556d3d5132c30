//! Per-directory build manifest and upward splicing.

use std::path::PathBuf;

use folio_core::{ContextMap, FileKind};
use folio_render::CollaboratorHandle;
use serde::{Deserialize, Serialize};

/// Outcome recorded for one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The artifact was (re)written this run.
    Produced,
    /// The artifact was already up to date.
    UpToDate,
    /// Excluded by an ignore declaration; any old artifact was removed.
    Ignored,
    /// Outside its availability window; any old artifact was removed.
    Unavailable,
    /// The collaborator failed; the old artifact was left untouched.
    Failed,
}

impl EntryStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(self, EntryStatus::Ignored | EntryStatus::Unavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Source name relative to the directory owning the manifest.
    pub source_filename: String,
    /// Produced name, same base as `source_filename`.
    pub produced_filename: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub is_available: bool,
    pub is_ignored: bool,
    pub kind: FileKind,
    pub collaborator: CollaboratorHandle,
    /// Front matter of markdown sources; empty otherwise.
    pub front_matter: ContextMap,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    /// Append a child directory's entries, prefixing their names with
    /// `prefix/`.
    pub fn splice(&mut self, prefix: &str, child: Manifest) {
        self.entries.extend(child.entries.into_iter().map(|mut e| {
            e.source_filename = format!("{prefix}/{}", e.source_filename);
            e.produced_filename = format!("{prefix}/{}", e.produced_filename);
            e
        }));
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn find(&self, source_filename: &str) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|e| e.source_filename == source_filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
