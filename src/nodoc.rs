//! Removal of `nodoc` subtrees from raw schema JSON.
//!
//! Runs before the typed model is built. The input is never mutated: a
//! filtered copy is rebuilt from the surviving nodes.

use serde_json::{Map, Value};

const NODOC_KEY: &str = "nodoc";

/// Return a copy of `raw` with every `nodoc` node removed.
///
/// `None` when the root itself is marked, meaning nothing is left to document.
pub fn filter(raw: &Value) -> Option<Value> {
    if is_nodoc(raw) {
        return None;
    }
    Some(rebuild(raw))
}

/// True if `value` is an object whose `nodoc` key is truthy.
pub fn is_nodoc(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|map| map.get(NODOC_KEY))
        .is_some_and(truthy)
}

fn rebuild(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, child)| !is_nodoc(child))
                .map(|(key, child)| (key.clone(), rebuild(child)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|child| !is_nodoc(child))
                .map(rebuild)
                .collect(),
        ),
        other => other.clone(),
    }
}

// Schema authors write `"nodoc": true`, but older files also use 1 or "true".
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contains_nodoc(value: &Value) -> bool {
        match value {
            Value::Object(map) => is_nodoc(value) || map.values().any(contains_nodoc),
            Value::Array(items) => items.iter().any(contains_nodoc),
            _ => false,
        }
    }

    #[test]
    fn root_marked_yields_nothing() {
        let raw = json!({ "namespace": "demo", "nodoc": true });
        assert_eq!(filter(&raw), None);
    }

    #[test]
    fn removes_list_elements() {
        let raw = json!({
            "namespace": "demo",
            "functions": [
                { "name": "a", "nodoc": true },
                { "name": "b", "nodoc": true },
                { "name": "c" }
            ]
        });
        let clean = filter(&raw).unwrap();
        assert_eq!(clean["functions"], json!([{ "name": "c" }]));
    }

    #[test]
    fn removes_map_keys() {
        let raw = json!({
            "namespace": "demo",
            "properties": {
                "hidden": { "type": "string", "nodoc": true },
                "shown": { "type": "string" }
            }
        });
        let clean = filter(&raw).unwrap();
        let props = clean["properties"].as_object().unwrap();
        assert!(!props.contains_key("hidden"));
        assert!(props.contains_key("shown"));
    }

    #[test]
    fn cascades_through_nesting() {
        let raw = json!({
            "namespace": "demo",
            "types": [{
                "id": "Widget",
                "properties": {
                    "inner": {
                        "type": "object",
                        "properties": { "secret": { "type": "string", "nodoc": 1 } }
                    }
                },
                "functions": [{ "name": "f", "parameters": [{ "name": "x", "nodoc": true }] }]
            }]
        });
        let clean = filter(&raw).unwrap();
        assert!(!contains_nodoc(&clean));
        assert_eq!(clean["types"][0]["functions"][0]["parameters"], json!([]));
    }

    #[test]
    fn false_marker_is_kept() {
        let raw = json!({ "namespace": "demo", "nodoc": false });
        assert_eq!(filter(&raw), Some(raw.clone()));
    }

    #[test]
    fn input_is_untouched() {
        let raw = json!({ "namespace": "demo", "events": [{ "name": "e", "nodoc": true }] });
        let before = raw.clone();
        let _ = filter(&raw);
        assert_eq!(raw, before);
    }
}
