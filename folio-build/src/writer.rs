//! Atomic writer, verbatim copier and artifact removal.
//!
//! ## `write_atomic`
//!
//! 1. Ensure the parent directory exists.
//! 2. Write to `<path>.folio.tmp`.
//! 3. Rename to the final path (atomic on POSIX); on failure remove the tmp
//!    file and leave any previous artifact intact.

use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{io_err, BuildError};

/// Outcome of an individual write or copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// Nothing to do; the destination already matches.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

/// Temporary sibling used while writing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.folio.tmp", path.display()))
}

/// Atomically replace `path` with `content`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<WriteResult, BuildError> {
    write_atomic_with_tmp(path, content, &tmp_path(path))
}

fn write_atomic_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<WriteResult, BuildError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    commit(tmp, path)?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Move a fully written temporary file into place.
pub fn commit(tmp: &Path, path: &Path) -> Result<(), BuildError> {
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Write only when the bytes on disk differ.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<WriteResult, BuildError> {
    match std::fs::read(path) {
        Ok(existing) if existing == content => {
            tracing::debug!(path = %path.display(), "unchanged");
            Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            })
        }
        _ => write_atomic(path, content),
    }
}

/// Copy `src` to `dst`, carrying the source mtime over.
///
/// Skipped when `dst` already has the same size and mtime, unless `force`.
pub fn copy_file(src: &Path, dst: &Path, force: bool) -> Result<WriteResult, BuildError> {
    let src_meta = std::fs::metadata(src).map_err(|e| io_err(src, e))?;
    let src_mtime = FileTime::from_last_modification_time(&src_meta);

    if !force {
        if let Ok(dst_meta) = std::fs::metadata(dst) {
            if dst_meta.len() == src_meta.len()
                && FileTime::from_last_modification_time(&dst_meta) == src_mtime
            {
                tracing::debug!(path = %dst.display(), "copy up to date");
                return Ok(WriteResult::Unchanged {
                    path: dst.to_path_buf(),
                });
            }
        }
    }

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = tmp_path(dst);
    std::fs::copy(src, &tmp).map_err(|e| io_err(&tmp, e))?;
    filetime::set_file_mtime(&tmp, src_mtime).map_err(|e| io_err(&tmp, e))?;
    commit(&tmp, dst)?;
    tracing::info!(path = %dst.display(), "copied");
    Ok(WriteResult::Written {
        path: dst.to_path_buf(),
    })
}

/// Remove a previously produced file or directory tree.
///
/// Returns `true` when something was removed.
pub fn remove_artifact(path: &Path) -> Result<bool, BuildError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(io_err(path, e)),
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), "removed");
    Ok(true)
}
