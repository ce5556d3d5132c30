//! Shared build pipeline entrypoint used by CLI and live mode.

use std::path::{Path, PathBuf};

use folio_core::{DirectoryTree, IgnoreRules, RunOptions, IGNORE_FILE};
use folio_render::Collaborators;

use crate::error::BuildError;
use crate::orchestrator::{BuildReport, Builder};

/// Run the build for `options`.
///
/// This is the canonical entrypoint for both `folio build` and every rebuild
/// in live mode. Only root validation and collection failures are returned as
/// errors; everything per file ends up in the report.
pub fn run(options: &RunOptions, collab: &Collaborators) -> Result<BuildReport, BuildError> {
    let (source, destination) = validate_roots(&options.source, &options.destination)?;
    tracing::info!(source = %source.display(), destination = %destination.display(), "build started");

    let rules = IgnoreRules::load(&source)?;
    let tree = collect(&source, Some(&destination), &rules)?;

    let options = RunOptions {
        source,
        destination,
        ..options.clone()
    };
    let mut builder = Builder::new(&options, collab);
    builder.open_run()?;
    tree.traverse(&mut builder)?;
    let report = builder.finish()?;

    tracing::info!(
        written = report.written,
        up_to_date = report.up_to_date,
        skipped = report.skipped,
        failed = report.failed,
        "build finished"
    );
    Ok(report)
}

/// Collect the source tree with structural exclusions applied: ignore-file
/// rules, the ignore file itself, and the destination when it sits inside the
/// source.
pub fn collect(
    source: &Path,
    destination: Option<&Path>,
    rules: &IgnoreRules,
) -> Result<DirectoryTree, BuildError> {
    let tree = DirectoryTree::collect(source, |parent, name, is_dir| {
        if parent.as_os_str().is_empty() && name == IGNORE_FILE {
            return true;
        }
        if is_dir && destination.is_some_and(|d| source.join(parent).join(name) == d) {
            return true;
        }
        rules.is_ignored(parent, name, is_dir)
    })?;
    Ok(tree)
}

/// Check the roots and create the destination. Returns canonical paths.
pub fn validate_roots(source: &Path, destination: &Path) -> Result<(PathBuf, PathBuf), BuildError> {
    if !source.is_dir() {
        return Err(BuildError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    let source = source
        .canonicalize()
        .map_err(|_| BuildError::SourceMissing {
            path: source.to_path_buf(),
        })?;

    std::fs::create_dir_all(destination).map_err(|e| BuildError::DestinationRoot {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let destination = destination
        .canonicalize()
        .map_err(|e| BuildError::DestinationRoot {
            path: destination.to_path_buf(),
            source: e,
        })?;

    if source == destination {
        return Err(BuildError::SameRoot { path: destination });
    }
    Ok((source, destination))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn same_root_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let err = run(
            &RunOptions::new(tmp.path(), tmp.path()),
            &Collaborators::external(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::SameRoot { .. }));
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let err = run(
            &RunOptions::new(tmp.path().join("nope"), tmp.path().join("out")),
            &Collaborators::external(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::SourceMissing { .. }));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    #[cfg(unix)]
    fn uncreatable_destination_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = run(
            &RunOptions::new(&src, blocker.join("out")),
            &Collaborators::external(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DestinationRoot { .. }));
    }

    #[test]
    fn destination_inside_source_is_not_collected() {
        let tmp = TempDir::new().expect("tmp");
        let src = tmp.path();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join(IGNORE_FILE), "*.tmp\n").unwrap();
        let (source, destination) = validate_roots(src, &src.join("_site")).unwrap();
        fs::write(destination.join("old.txt"), "x").unwrap();

        let tree = collect(&source, Some(&destination), &IgnoreRules::load(&source).unwrap()).unwrap();
        assert!(tree.nodes().all(|(_, n)| n.name != "_site"));
        let root = tree.node(folio_core::NodeId::ROOT);
        assert_eq!(root.files.other, vec!["a.txt"]);
    }

    #[test]
    fn empty_tree_builds_empty_report() {
        let tmp = TempDir::new().expect("tmp");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let report = run(
            &RunOptions::new(&src, tmp.path().join("out")),
            &Collaborators::external(),
        )
        .expect("run");
        assert!(report.manifest.is_empty());
        assert!(report.next_transition.is_none());
        assert!(tmp.path().join("out").is_dir());
    }
}
