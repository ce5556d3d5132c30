//! # folio-build
//!
//! Incremental build of a source tree into a mirrored destination tree.
//!
//! Call [`pipeline::run`] with a [`folio_core::RunOptions`] and a set of
//! [`folio_render::Collaborators`]; the returned [`BuildReport`] carries the
//! flattened manifest and the next availability transition.

pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod pipeline;
pub mod staleness;
pub mod writer;

pub use error::BuildError;
pub use manifest::{EntryStatus, Manifest, ManifestEntry};
pub use orchestrator::BuildReport;
pub use pipeline::run;
pub use writer::WriteResult;
