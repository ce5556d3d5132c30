//! Directory configuration and front matter loading against real files.

use assert_fs::prelude::*;
use serde_json::json;

use folio_core::config::{load_yaml_map, merge_directory_config, parse_front_matter};
use folio_core::LoadError;

#[test]
fn corrupt_yaml_is_a_load_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("site.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = load_yaml_map(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { ref path, .. } if path == file.path()), "got: {err}");
}

#[test]
fn list_document_is_not_a_mapping() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("site.yaml");
    file.write_str("- this is a list, not a mapping\n").expect("write");

    let err = load_yaml_map(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::NotAMapping { .. }), "got: {err}");
}

#[test]
fn merge_skips_broken_files_and_later_files_win() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("a.yaml")
        .write_str("title: first\nauthor: ada\n")
        .expect("write");
    dir.child("b.yaml").write_str("[unclosed").expect("write");
    dir.child("c.yml").write_str("title: last\n").expect("write");

    let merged = merge_directory_config(dir.path(), &["a.yaml", "b.yaml", "c.yml", "missing.yaml"]);
    assert_eq!(merged.get("title"), Some(&json!("last")));
    assert_eq!(merged.get("author"), Some(&json!("ada")));
    assert_eq!(merged.len(), 2);
}

#[test]
fn front_matter_from_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("post.md");
    file.write_str("---\ntitle: Hello\ntags: [a, b]\n---\n# Body\n")
        .expect("write");

    let text = std::fs::read_to_string(file.path()).expect("read");
    let (fm, body) = parse_front_matter(&text, file.path()).expect("front matter");
    assert_eq!(fm.get("title"), Some(&json!("Hello")));
    assert_eq!(fm.get("tags"), Some(&json!(["a", "b"])));
    assert_eq!(body, "# Body\n");
}
