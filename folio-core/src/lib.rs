//! folio core library: scoped context, source tree, policies, errors.
//!
//! - [`context`]: [`ScopedContext`] push/pop key/value store
//! - [`tree`]: [`DirectoryTree`] collection and traversal
//! - [`policy`]: availability windows and ignore declarations
//! - [`ignore`]: `.folioignore` rules
//! - [`config`]: directory YAML and front matter loading
//! - [`types`]: shared domain types
//! - [`error`]: error enums

pub mod config;
pub mod context;
pub mod error;
pub mod ignore;
pub mod policy;
pub mod tree;
pub mod types;

pub use context::{ContextMap, ScopedContext};
pub use error::{CoreError, LoadError, PolicyError, ScopeError};
pub use ignore::IgnoreRules;
pub use policy::{AvailabilityWindow, DirectoryPolicy, TimeBound, Verdict};
pub use tree::{DirNode, DirectoryTree, FileBuckets, NodeId, TreeVisitor, Visit};
pub use types::{FileKind, RunOptions, FRAGMENTS_DIR, IGNORE_FILE};
