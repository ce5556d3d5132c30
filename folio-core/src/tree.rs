//! Source tree collection and depth-first traversal.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]; both collection and
//! traversal use an explicit stack, so deep trees never recurse.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};
use crate::types::{FileKind, FRAGMENTS_DIR};

/// Index of a directory in a [`DirectoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// File names of one directory, bucketed by [`FileKind`] and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBuckets {
    pub config: Vec<String>,
    pub markup: Vec<String>,
    pub markdown: Vec<String>,
    pub notebook: Vec<String>,
    pub other: Vec<String>,
}

impl FileBuckets {
    pub fn get(&self, kind: FileKind) -> &[String] {
        match kind {
            FileKind::Config => &self.config,
            FileKind::Markup => &self.markup,
            FileKind::Markdown => &self.markdown,
            FileKind::Notebook => &self.notebook,
            FileKind::Other => &self.other,
        }
    }

    fn push(&mut self, name: String) {
        let bucket = match FileKind::classify(&name) {
            FileKind::Config => &mut self.config,
            FileKind::Markup => &mut self.markup,
            FileKind::Markdown => &mut self.markdown,
            FileKind::Notebook => &mut self.notebook,
            FileKind::Other => &mut self.other,
        };
        bucket.push(name);
    }

    /// Every file with its kind, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (FileKind, &str)> + '_ {
        FileKind::all()
            .iter()
            .flat_map(move |kind| self.get(*kind).iter().map(move |n| (*kind, n.as_str())))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(FileKind::classify(name)).iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        FileKind::all().iter().map(|k| self.get(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One collected directory.
#[derive(Debug, Clone)]
pub struct DirNode {
    /// Path relative to the tree root; empty for the root itself.
    pub rel_path: PathBuf,
    pub name: String,
    pub files: FileBuckets,
    /// Ordinary subdirectories, sorted by name.
    pub children: Vec<NodeId>,
    /// The reserved fragments subdirectory, if present.
    pub fragments: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl DirNode {
    /// Whether `name` is a direct child (file or ordinary subdirectory).
    pub fn has_child(&self, tree: &DirectoryTree, name: &str) -> bool {
        self.files.contains(name) || self.child_dir(tree, name).is_some()
    }

    pub fn child_dir(&self, tree: &DirectoryTree, name: &str) -> Option<NodeId> {
        self.children
            .iter()
            .copied()
            .find(|id| tree.node(*id).name == name)
    }
}

/// Result of [`TreeVisitor::process`] for one directory.
#[derive(Debug)]
pub struct Visit<O> {
    /// Child subtrees that must not be entered.
    pub skip: HashSet<NodeId>,
    /// State handed back to [`TreeVisitor::leave`].
    pub outcome: O,
}

impl<O> Visit<O> {
    pub fn new(outcome: O) -> Self {
        Self {
            skip: HashSet::new(),
            outcome,
        }
    }
}

/// Callbacks driven by [`DirectoryTree::traverse`].
///
/// For every entered directory the order is `enter`, `process`, then the
/// non-skipped children, then `leave`. The fragments child is never visited;
/// `process` is expected to handle it.
pub trait TreeVisitor {
    type Error;
    type Outcome;

    fn enter(&mut self, tree: &DirectoryTree, node: NodeId) -> Result<(), Self::Error>;

    fn process(
        &mut self,
        tree: &DirectoryTree,
        node: NodeId,
    ) -> Result<Visit<Self::Outcome>, Self::Error>;

    /// Called once for the root of each pruned subtree.
    fn skipped(&mut self, _tree: &DirectoryTree, _node: NodeId) {}

    fn leave(
        &mut self,
        tree: &DirectoryTree,
        node: NodeId,
        outcome: Self::Outcome,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone)]
pub struct DirectoryTree {
    root: PathBuf,
    nodes: Vec<DirNode>,
}

impl DirectoryTree {
    /// Walk `root` and collect every directory and file.
    ///
    /// `exclude(parent_rel, name, is_dir)` is consulted for each entry, with
    /// `parent_rel` relative to `root`; returning `true` drops the entry (and,
    /// for directories, everything below it) from the tree.
    ///
    /// Failing to read `root` itself is an error. Unreadable subdirectories
    /// are logged and left empty.
    pub fn collect<F>(root: &Path, mut exclude: F) -> Result<Self, CoreError>
    where
        F: FnMut(&Path, &str, bool) -> bool,
    {
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
        let mut tree = DirectoryTree {
            root: root.to_path_buf(),
            nodes: vec![DirNode {
                rel_path: PathBuf::new(),
                name: root_name,
                files: FileBuckets::default(),
                children: Vec::new(),
                fragments: None,
                parent: None,
            }],
        };

        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let rel = tree.node(id).rel_path.clone();
            let full = root.join(&rel);
            let entries = match read_sorted(&full) {
                Ok(entries) => entries,
                Err(e) if id == NodeId::ROOT => return Err(e),
                Err(e) => {
                    tracing::warn!(target: "folio::load", error = %e, "skipping unreadable directory");
                    continue;
                }
            };

            for (name, is_dir) in entries {
                if exclude(&rel, &name, is_dir) {
                    tracing::debug!(path = %rel.join(&name).display(), "excluded from collection");
                    continue;
                }
                if !is_dir {
                    tree.nodes[id.0].files.push(name);
                    continue;
                }
                let child = NodeId(tree.nodes.len());
                tree.nodes.push(DirNode {
                    rel_path: rel.join(&name),
                    name: name.clone(),
                    files: FileBuckets::default(),
                    children: Vec::new(),
                    fragments: None,
                    parent: Some(id),
                });
                if name == FRAGMENTS_DIR {
                    tree.nodes[id.0].fragments = Some(child);
                } else {
                    tree.nodes[id.0].children.push(child);
                }
                stack.push(child);
            }
        }
        Ok(tree)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node(&self, id: NodeId) -> &DirNode {
        &self.nodes[id.0]
    }

    /// Absolute (root-joined) path of a directory.
    pub fn source_path(&self, id: NodeId) -> PathBuf {
        self.root.join(&self.node(id).rel_path)
    }

    /// All nodes, root first. Includes fragments directories.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DirNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first walk from the root, honouring each directory's skip set.
    pub fn traverse<V: TreeVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        enum Step<O> {
            Enter(NodeId),
            Leave(NodeId, O),
        }

        let mut stack = vec![Step::Enter(NodeId::ROOT)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    visitor.enter(self, id)?;
                    let visit = visitor.process(self, id)?;
                    stack.push(Step::Leave(id, visit.outcome));
                    for child in self.node(id).children.iter().rev() {
                        if visit.skip.contains(child) {
                            tracing::info!(
                                target: "folio::skipped",
                                path = %self.node(*child).rel_path.display(),
                                "subtree skipped"
                            );
                            visitor.skipped(self, *child);
                        } else {
                            stack.push(Step::Enter(*child));
                        }
                    }
                }
                Step::Leave(id, outcome) => visitor.leave(self, id, outcome)?,
            }
        }
        Ok(())
    }
}

fn read_sorted(dir: &Path) -> Result<Vec<(String, bool)>, CoreError> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        out.push((name, entry.path().is_dir()));
    }
    out.sort();
    Ok(out)
}
