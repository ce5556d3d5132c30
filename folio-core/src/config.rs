//! Directory configuration files and markdown front matter.

use std::path::Path;

use serde_json::Value;

use crate::context::ContextMap;
use crate::error::LoadError;

const FENCE: &str = "---";

/// Parse YAML text into a string-keyed map. Empty or null documents are an
/// empty map; any other non-mapping document is an error.
pub fn parse_yaml_map(text: &str, path: &Path) -> Result<ContextMap, LoadError> {
    if text.trim().is_empty() {
        return Ok(ContextMap::new());
    }
    let value: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Null => Ok(ContextMap::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

pub fn load_yaml_map(path: &Path) -> Result<ContextMap, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml_map(&text, path)
}

/// Merge every named configuration file of `dir`, in the given order.
/// Files that fail to load are logged on `folio::load` and contribute nothing.
pub fn merge_directory_config<S: AsRef<str>>(dir: &Path, names: &[S]) -> ContextMap {
    let mut merged = ContextMap::new();
    for name in names {
        let path = dir.join(name.as_ref());
        match load_yaml_map(&path) {
            Ok(map) => merged.extend(map),
            Err(e) => tracing::warn!(target: "folio::load", error = %e, "ignoring configuration file"),
        }
    }
    merged
}

/// Split a leading `---` fenced block off `text`.
///
/// Returns `(front_matter, body)`; `front_matter` is `None` when the text does
/// not open with a fence or the fence is never closed.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE || line.trim_end() == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse the front matter of a document, returning the map and the body.
pub fn parse_front_matter<'a>(text: &'a str, path: &Path) -> Result<(ContextMap, &'a str), LoadError> {
    match split_front_matter(text) {
        (Some(yaml), body) => Ok((parse_yaml_map(yaml, path)?, body)),
        (None, body) => Ok((ContextMap::new(), body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn split_extracts_block_and_body() {
        let (fm, body) = split_front_matter("---\ntitle: Hi\n---\n# Body\n");
        assert_eq!(fm, Some("title: Hi\n"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn split_without_fence_or_unclosed() {
        assert_eq!(split_front_matter("# Plain\n"), (None, "# Plain\n"));
        let open = "---\ntitle: x\nno close\n";
        assert_eq!(split_front_matter(open), (None, open));
        assert_eq!(split_front_matter("----\n"), (None, "----\n"));
    }

    #[test]
    fn parse_front_matter_reads_keys() {
        let (map, body) =
            parse_front_matter("---\nto: pdf\ncss: [a.css]\n---\ntext", Path::new("a.md")).unwrap();
        assert_eq!(map.get("to"), Some(&json!("pdf")));
        assert_eq!(map.get("css"), Some(&json!(["a.css"])));
        assert_eq!(body, "text");
    }

    #[test]
    fn non_mapping_is_rejected() {
        let err = parse_yaml_map("- a\n- b\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::NotAMapping { .. }));
    }

    #[test]
    fn empty_document_is_empty_map() {
        assert!(parse_yaml_map("", Path::new("x.yaml")).unwrap().is_empty());
        assert!(parse_yaml_map("~\n", Path::new("x.yaml")).unwrap().is_empty());
    }

    #[test]
    fn merge_is_ordered_and_fail_soft() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.yaml"), "title: first\nkeep: 1\n").unwrap();
        fs::write(tmp.path().join("b.yaml"), "title: second\n").unwrap();
        fs::write(tmp.path().join("c.yaml"), "title: [unclosed\n").unwrap();
        let merged = merge_directory_config(tmp.path(), &["a.yaml", "b.yaml", "c.yaml", "gone.yml"]);
        assert_eq!(merged.get("title"), Some(&json!("second")));
        assert_eq!(merged.get("keep"), Some(&json!(1)));
    }
}
