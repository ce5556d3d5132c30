//! Custom converters plug in through the public trait.

use std::path::Path;

use folio_core::ContextMap;
use folio_render::{
    Collaborators, ConvertOutput, ConvertRequest, DocumentConverter, DocumentOptions, RenderError,
};
use serde_json::json;

struct Shout;

impl DocumentConverter for Shout {
    fn name(&self) -> &str {
        "shout"
    }

    fn convert(&self, request: &ConvertRequest<'_>) -> Result<ConvertOutput, RenderError> {
        let title = request
            .context
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        Ok(ConvertOutput::Buffer(format!(
            "<h1>{title}</h1>{}",
            request.buffer.to_uppercase()
        )))
    }
}

#[test]
fn custom_converter_sees_snapshot_and_buffer() {
    let collab = Collaborators::new(Box::new(Shout), Box::new(Shout));
    let mut ctx = ContextMap::new();
    ctx.insert("title".into(), json!("T"));
    let opts = DocumentOptions::default();
    let out = collab
        .document
        .convert(&ConvertRequest {
            source: Path::new("a.md"),
            buffer: "body",
            context: &ctx,
            options: &opts,
            output: None,
        })
        .expect("convert");
    assert_eq!(out, ConvertOutput::Buffer("<h1>T</h1>BODY".into()));

    let wrapped = collab
        .templates
        .render_str("<main>{{ body }}</main>", &ctx, &[("body", json!("x"))])
        .expect("render");
    assert_eq!(wrapped, "<main>x</main>");
}
