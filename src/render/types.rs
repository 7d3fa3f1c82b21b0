//! Type information for property and type outputs.
//!
//! Exactly one of `choices`, `link`, `array`, `enum_values` or `simple_type`
//! is produced for a given kind.

use serde_json::{json, Map, Value};

use super::value::with_last_marker;
use super::Generator;
use crate::model::PropertyType;

impl Generator<'_> {
    /// Render the kind-specific fields for a node of type `kind`.
    pub fn render_type_info(&self, kind: &PropertyType, instance_of: Option<&str>) -> Map<String, Value> {
        let mut dst = Map::new();
        match kind {
            PropertyType::Choices(choices) => {
                let rendered = choices.iter().map(|c| self.generate_property(c)).collect();
                dst.insert("choices".into(), Value::Array(with_last_marker(rendered)));
            }
            PropertyType::Ref(ref_type) => {
                dst.insert("link".into(), self.link(ref_type));
            }
            PropertyType::Array(item_type) => {
                dst.insert("array".into(), self.generate_property(item_type));
            }
            PropertyType::Enum(values) => {
                let rendered = values.iter().map(|name| json!({ "name": name })).collect();
                dst.insert("enum_values".into(), Value::Array(with_last_marker(rendered)));
            }
            PropertyType::Primitive(_)
            | PropertyType::Function
            | PropertyType::AdditionalProperties => {
                let simple_type = match instance_of {
                    Some(name) => name.to_lowercase(),
                    None => kind.name().to_string(),
                };
                dst.insert("simple_type".into(), Value::String(simple_type));
            }
        }
        dst
    }
}
