//! Conversion options read from the scope of a single document.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use folio_core::ContextMap;
use serde_json::Value;

use crate::error::RenderError;

/// Target format of the document converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
    Beamer,
    Latex,
}

impl OutputFormat {
    /// File extension of the produced artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf | OutputFormat::Beamer => "pdf",
            OutputFormat::Latex => "tex",
        }
    }

    /// pandoc writer name. PDF output goes through LaTeX; pandoc picks the
    /// PDF engine from the `.pdf` output extension.
    pub fn writer(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf | OutputFormat::Latex => "latex",
            OutputFormat::Beamer => "beamer",
        }
    }

    /// Whether the converter can hand the result back as a text buffer.
    pub fn is_textual(&self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::Latex)
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "beamer" => Ok(OutputFormat::Beamer),
            "latex" => Ok(OutputFormat::Latex),
            other => Err(RenderError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Beamer => "beamer",
            OutputFormat::Latex => "latex",
        };
        f.write_str(s)
    }
}

/// Declared option set handed to a document converter.
///
/// File references are resolved at construction: a leading `/` is relative to
/// the source root, anything else to the document's directory. References to
/// files that do not exist are logged and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub to: OutputFormat,
    pub template: Option<PathBuf>,
    pub render: Option<PathBuf>,
    pub css: Vec<String>,
    pub bibliography: Option<PathBuf>,
    pub csl: Option<PathBuf>,
    pub include_in_header: Vec<PathBuf>,
    pub include_before_body: Vec<PathBuf>,
    pub include_after_body: Vec<PathBuf>,
    pub highlight_style: Option<String>,
    pub preprocess_template: bool,
    pub copy_source: bool,
}

impl DocumentOptions {
    pub fn from_scope(scope: &ContextMap, file_dir: &Path, root: &Path) -> Result<Self, RenderError> {
        let to = match string(scope, "to")? {
            Some(s) => s.parse()?,
            None => OutputFormat::Html,
        };
        let file = |key: &str| -> Result<Option<PathBuf>, RenderError> {
            Ok(string(scope, key)?.and_then(|raw| existing(key, resolve_path(&raw, file_dir, root))))
        };
        let files = |key: &str| -> Result<Vec<PathBuf>, RenderError> {
            Ok(list(scope, key)?
                .into_iter()
                .filter_map(|raw| existing(key, resolve_path(&raw, file_dir, root)))
                .collect())
        };

        Ok(DocumentOptions {
            to,
            template: file("template")?,
            render: file("render")?,
            css: list(scope, "css")?,
            bibliography: file("bibliography")?,
            csl: file("csl")?,
            include_in_header: files("include-in-header")?,
            include_before_body: files("include-before-body")?,
            include_after_body: files("include-after-body")?,
            highlight_style: string(scope, "highlight-style")?,
            preprocess_template: flag(scope, "preprocess-template"),
            copy_source: flag(scope, "copy-source"),
        })
    }

    /// Every file this document's output depends on besides the source.
    pub fn dependencies(&self) -> Vec<PathBuf> {
        let mut deps: Vec<PathBuf> = [&self.template, &self.render, &self.bibliography, &self.csl]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        deps.extend(self.include_in_header.iter().cloned());
        deps.extend(self.include_before_body.iter().cloned());
        deps.extend(self.include_after_body.iter().cloned());
        deps
    }

    /// File name of the produced artifact for source `name`.
    pub fn output_name(&self, name: &str) -> String {
        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        format!("{stem}.{}", self.to.extension())
    }
}

/// Resolve a reference from a document or directory configuration.
pub fn resolve_path(raw: &str, file_dir: &Path, root: &Path) -> PathBuf {
    match raw.strip_prefix('/') {
        Some(rooted) => root.join(rooted),
        None => file_dir.join(raw),
    }
}

fn existing(key: &str, path: PathBuf) -> Option<PathBuf> {
    if path.is_file() {
        Some(path)
    } else {
        tracing::warn!(target: "folio::load", option = key, path = %path.display(), "referenced file not found");
        None
    }
}

fn string(scope: &ContextMap, key: &str) -> Result<Option<String>, RenderError> {
    match scope.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RenderError::InvalidOption {
            key: key.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

fn list(scope: &ContextMap, key: &str) -> Result<Vec<String>, RenderError> {
    match scope.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(RenderError::InvalidOption {
                    key: key.to_string(),
                    message: format!("expected strings, got {other}"),
                }),
            })
            .collect(),
        Some(other) => Err(RenderError::InvalidOption {
            key: key.to_string(),
            message: format!("expected a string or list, got {other}"),
        }),
    }
}

fn flag(scope: &ContextMap, key: &str) -> bool {
    matches!(scope.get(key), Some(Value::Bool(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn scope(pairs: &[(&str, Value)]) -> ContextMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[rstest]
    #[case("html", "notes.html")]
    #[case("pdf", "notes.pdf")]
    #[case("beamer", "notes.pdf")]
    #[case("latex", "notes.tex")]
    fn output_name_follows_format(#[case] to: &str, #[case] expected: &str) {
        let tmp = TempDir::new().unwrap();
        let opts =
            DocumentOptions::from_scope(&scope(&[("to", json!(to))]), tmp.path(), tmp.path()).unwrap();
        assert_eq!(opts.output_name("notes.md"), expected);
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = DocumentOptions::from_scope(&scope(&[("to", json!("docx"))]), tmp.path(), tmp.path())
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat { .. }));
    }

    #[test]
    fn references_resolve_and_missing_are_dropped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let dir = root.join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(root.join("page.html"), "{{ body }}").unwrap();
        fs::write(dir.join("refs.bib"), "").unwrap();

        let opts = DocumentOptions::from_scope(
            &scope(&[
                ("render", json!("/page.html")),
                ("bibliography", json!("refs.bib")),
                ("csl", json!("missing.csl")),
                ("css", json!("style.css")),
                ("include-in-header", json!(["/nope.tex"])),
                ("copy-source", json!(true)),
            ]),
            &dir,
            root,
        )
        .unwrap();

        assert_eq!(opts.render, Some(root.join("page.html")));
        assert_eq!(opts.bibliography, Some(dir.join("refs.bib")));
        assert_eq!(opts.csl, None);
        assert_eq!(opts.css, vec!["style.css"]);
        assert!(opts.include_in_header.is_empty());
        assert!(opts.copy_source);
        assert_eq!(
            opts.dependencies(),
            vec![root.join("page.html"), dir.join("refs.bib")]
        );
    }

    #[test]
    fn wrong_option_type_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let err = DocumentOptions::from_scope(&scope(&[("css", json!(3))]), tmp.path(), tmp.path())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidOption { .. }));
    }
}
