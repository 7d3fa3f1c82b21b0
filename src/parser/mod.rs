//! Schema loading: text → raw JSON → filtered, typed namespaces.

pub mod comments;
pub mod schema;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::model::Namespace;
use crate::nodoc;

/// Parse a schema document into its raw namespace objects.
///
/// A document holds either one namespace object or a list of them.
pub fn read_document(text: &str) -> serde_json::Result<Vec<Value>> {
    let json: Value = serde_json::from_str(&comments::strip_comments(text))?;
    Ok(match json {
        Value::Array(items) => items,
        other => vec![other],
    })
}

/// Drop `nodoc` subtrees from `raw`, then build the typed model.
///
/// `Ok(None)` when the namespace itself is marked `nodoc`.
pub fn load_namespace(raw: &Value) -> Result<Option<Namespace>> {
    match nodoc::filter(raw) {
        Some(clean) => schema::parse_namespace(&clean).map(Some),
        None => {
            debug!(
                namespace = raw.get("namespace").and_then(serde_json::Value::as_str).unwrap_or("<unnamed>"),
                "namespace excluded by nodoc"
            );
            Ok(None)
        }
    }
}
