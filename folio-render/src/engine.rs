//! Tera template expansion for static markup, render templates, fragments and
//! aggregation pages.

use std::path::Path;

use folio_core::ContextMap;
use serde_json::Value;
use tera::Tera;

use crate::context::to_tera_context;
use crate::error::{io_err, RenderError};

/// Stateless tera front end. Autoescaping is off: inputs are HTML already.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        TemplateEngine
    }

    /// Expand `source` against `snapshot` plus `extra` values.
    pub fn render_str(
        &self,
        source: &str,
        snapshot: &ContextMap,
        extra: &[(&str, Value)],
    ) -> Result<String, RenderError> {
        let ctx = to_tera_context(snapshot, extra)?;
        Ok(Tera::one_off(source, &ctx, false)?)
    }

    /// Read the template at `path` and expand it.
    pub fn render_file(
        &self,
        path: &Path,
        snapshot: &ContextMap,
        extra: &[(&str, Value)],
    ) -> Result<String, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        tracing::debug!(template = %path.display(), "expanding template");
        self.render_str(&source, snapshot, extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn snap() -> ContextMap {
        let mut m = ContextMap::new();
        m.insert("title".into(), json!("Notes"));
        m.insert("nav_html".into(), json!("<nav>x</nav>"));
        m
    }

    #[test]
    fn render_str_expands_scope_without_escaping() {
        let engine = TemplateEngine::new();
        let out = engine
            .render_str("<h1>{{ title }}</h1>{{ nav_html }}", &snap(), &[])
            .unwrap();
        assert_eq!(out, "<h1>Notes</h1><nav>x</nav>");
    }

    #[test]
    fn render_file_uses_extra_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        fs::write(&path, "<main>{{ body }}</main>").unwrap();
        let out = TemplateEngine::new()
            .render_file(&path, &snap(), &[("body", json!("<p>hi</p>"))])
            .unwrap();
        assert_eq!(out, "<main><p>hi</p></main>");
    }

    #[test]
    fn missing_template_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = TemplateEngine::new()
            .render_file(&tmp.path().join("nope.html"), &snap(), &[])
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn undefined_variable_is_tera_error() {
        let err = TemplateEngine::new()
            .render_str("{{ missing }}", &snap(), &[])
            .unwrap_err();
        assert!(matches!(err, RenderError::Tera(_)));
    }
}
