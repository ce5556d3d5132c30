//! Ignore file applied during tree collection.

use std::fs;

use folio_core::{DirectoryTree, IgnoreRules, NodeId};
use tempfile::TempDir;

#[test]
fn drafts_pattern_excludes_only_drafts() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    fs::create_dir_all(root.join("_drafts")).unwrap();
    fs::create_dir_all(root.join("posts")).unwrap();
    fs::write(root.join("_drafts/a.md"), "# draft").unwrap();
    fs::write(root.join("posts/a.md"), "# post").unwrap();
    fs::write(root.join(".folioignore"), "_drafts/*\n").unwrap();

    let rules = IgnoreRules::load(root).expect("rules");
    let tree = DirectoryTree::collect(root, |parent, name, is_dir| {
        rules.is_ignored(parent, name, is_dir)
    })
    .expect("collect");

    let top = tree.node(NodeId::ROOT);
    let drafts = top.child_dir(&tree, "_drafts").expect("drafts dir");
    let posts = top.child_dir(&tree, "posts").expect("posts dir");
    assert!(tree.node(drafts).files.is_empty());
    assert_eq!(tree.node(posts).files.markdown, vec!["a.md"]);
}
