//! `.folioignore` parsing and matching.
//!
//! One glob per line. Text before the last `/` is matched against the
//! containing directory (relative to the source root), the rest against the
//! entry name. A pattern without `/` matches the name in any directory. A
//! trailing `/` restricts the rule to directories. `#` starts a comment.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{io_err, CoreError};
use crate::types::IGNORE_FILE;

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: String,
    dir: Option<GlobMatcher>,
    name: GlobMatcher,
    dir_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

fn glob(pattern: &str) -> Result<GlobMatcher, CoreError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| CoreError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

impl IgnoreRules {
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let mut rules = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (body, dir_only) = match line.strip_suffix('/') {
                Some(body) => (body, true),
                None => (line, false),
            };
            let (dir, name) = match body.rfind('/') {
                Some(i) => (Some(body[..i].trim_start_matches('/')), &body[i + 1..]),
                None => (None, body),
            };
            rules.push(IgnoreRule {
                pattern: line.to_string(),
                dir: dir.map(glob).transpose()?,
                name: glob(name)?,
                dir_only,
            });
        }
        Ok(Self { rules })
    }

    /// Read `<root>/.folioignore`. A missing file yields no rules.
    pub fn load(root: &Path) -> Result<Self, CoreError> {
        let path = root.join(IGNORE_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(io_err(path, e)),
        }
    }

    /// Whether `name` inside directory `parent_rel` is excluded.
    pub fn is_ignored(&self, parent_rel: &Path, name: &str, is_dir: bool) -> bool {
        let parent = parent_rel.to_string_lossy().replace('\\', "/");
        self.rules.iter().any(|rule| {
            if rule.dir_only && !is_dir {
                return false;
            }
            if !rule.name.is_match(name) {
                return false;
            }
            match &rule.dir {
                None => true,
                Some(dir) if dir.glob().glob().is_empty() => parent.is_empty(),
                Some(dir) => dir.is_match(&parent),
            }
        })
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
