//! Conversion from a scope snapshot to a tera rendering context.

use folio_core::ContextMap;
use serde_json::Value;

use crate::error::RenderError;

/// Build a [`tera::Context`] from a scope snapshot plus optional extra values
/// (`body`, `manifest`) that shadow snapshot keys of the same name.
pub fn to_tera_context(
    snapshot: &ContextMap,
    extra: &[(&str, Value)],
) -> Result<tera::Context, RenderError> {
    let mut ctx = tera::Context::from_serialize(snapshot)?;
    for (key, value) in extra {
        ctx.insert(*key, value);
    }
    Ok(ctx)
}

/// Scalars as `key=value` strings, for converters that take metadata flags.
pub fn scalar_metadata(snapshot: &ContextMap) -> Vec<(String, String)> {
    snapshot
        .iter()
        .filter_map(|(k, v)| {
            let s = match v {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((k.clone(), s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_values_shadow_snapshot() {
        let mut snap = ContextMap::new();
        snap.insert("body".into(), json!("old"));
        snap.insert("title".into(), json!("T"));
        let ctx = to_tera_context(&snap, &[("body", json!("new"))]).unwrap();
        assert_eq!(ctx.get("body"), Some(&json!("new")));
        assert_eq!(ctx.get("title"), Some(&json!("T")));
    }

    #[test]
    fn scalar_metadata_skips_structures() {
        let mut snap = ContextMap::new();
        snap.insert("title".into(), json!("T"));
        snap.insert("draft".into(), json!(false));
        snap.insert("tags".into(), json!(["a"]));
        let meta = scalar_metadata(&snap);
        assert_eq!(
            meta,
            vec![
                ("draft".to_string(), "false".to_string()),
                ("title".to_string(), "T".to_string())
            ]
        );
    }
}
