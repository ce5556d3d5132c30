//! mtime-based staleness check.
//!
//! Signal precedence:
//! 1. `Forced` (ignore-times run)
//! 2. `MissingOutput` (destination absent or unreadable)
//! 3. `Outdated` (some dependency strictly newer than the destination)
//! 4. `Current`
//!
//! There is no content hashing. A dependency whose mtime was preserved by a
//! copy, or a skewed clock, can make a stale output look current; this is a
//! best-effort check.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StalenessSignal {
    Forced,
    MissingOutput,
    Outdated { dependency: PathBuf },
    Current,
}

impl StalenessSignal {
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, StalenessSignal::Current)
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Classify `destination` against the files it was produced from.
pub fn check(dependencies: &[PathBuf], destination: &Path, ignore_times: bool) -> StalenessSignal {
    if ignore_times {
        return StalenessSignal::Forced;
    }
    let Some(produced) = mtime(destination) else {
        return StalenessSignal::MissingOutput;
    };
    for dep in dependencies {
        match mtime(dep) {
            Some(t) if t > produced => {
                return StalenessSignal::Outdated {
                    dependency: dep.clone(),
                }
            }
            Some(_) => {}
            None => tracing::debug!(dependency = %dep.display(), "dependency has no readable mtime"),
        }
    }
    StalenessSignal::Current
}

pub fn needs_rebuild(dependencies: &[PathBuf], destination: &Path, ignore_times: bool) -> bool {
    check(dependencies, destination, ignore_times).needs_rebuild()
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::fs;
    use tempfile::TempDir;

    fn at(secs: i64) -> FileTime {
        FileTime::from_unix_time(1_700_000_000 + secs, 0)
    }

    fn setup() -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.md");
        let tpl = tmp.path().join("page.html");
        let out = tmp.path().join("a.html");
        for p in [&src, &tpl, &out] {
            fs::write(p, "x").unwrap();
        }
        set_file_mtime(&src, at(0)).unwrap();
        set_file_mtime(&tpl, at(0)).unwrap();
        set_file_mtime(&out, at(10)).unwrap();
        (tmp, src, tpl, out)
    }

    #[test]
    fn current_when_output_newer() {
        let (_tmp, src, tpl, out) = setup();
        assert_eq!(check(&[src, tpl], &out, false), StalenessSignal::Current);
    }

    #[test]
    fn forced_wins() {
        let (_tmp, src, _tpl, out) = setup();
        assert_eq!(check(&[src], &out, true), StalenessSignal::Forced);
    }

    #[test]
    fn missing_output() {
        let (tmp, src, _tpl, _out) = setup();
        let signal = check(&[src], &tmp.path().join("b.html"), false);
        assert_eq!(signal, StalenessSignal::MissingOutput);
        assert!(signal.needs_rebuild());
    }

    #[test]
    fn any_newer_dependency_is_outdated() {
        let (_tmp, src, tpl, out) = setup();
        set_file_mtime(&tpl, at(20)).unwrap();
        assert_eq!(
            check(&[src, tpl.clone()], &out, false),
            StalenessSignal::Outdated { dependency: tpl }
        );
    }

    #[test]
    fn equal_mtime_is_current() {
        let (_tmp, src, _tpl, out) = setup();
        set_file_mtime(&src, at(10)).unwrap();
        assert!(!needs_rebuild(&[src], &out, false));
    }

    #[test]
    fn missing_dependency_is_ignored() {
        let (tmp, src, _tpl, out) = setup();
        let gone = tmp.path().join("gone.bib");
        assert!(!needs_rebuild(&[src, gone], &out, false));
    }
}
