//! Documentation tree generation.
//!
//! [`Generator`] walks a namespace top-down and produces a plain
//! [`serde_json::Value`] tree for templates. The tree holds no references
//! back into the model. Key sets per node kind:
//!
//! - namespace: `name, types, functions, events, properties`
//! - type: `name, description, properties, functions, events, id` + type info
//! - function: `name, description, callback, parameters, returns, id, parent_name`
//! - event: `name, description, parameters, callback, conditions, actions,
//!   filters, supportsRules, id, parent_name`
//! - property: `name, optional, description, properties, functions, id,
//!   parent_name` + `value` or type info
//! - callback: the property keys + `simple_type` ("function") and `parameters`

pub mod description;
pub mod types;
pub mod value;

use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use crate::ids::{build_id, IdPrefix};
use crate::model::*;
use crate::resolver::ReferenceResolver;
use description::format_description;
use value::{format_value, with_last_marker};

/// Builds the documentation tree for one namespace.
pub struct Generator<'a> {
    namespace: Option<&'a Namespace>,
    resolver: &'a dyn ReferenceResolver,
}

impl<'a> Generator<'a> {
    /// `namespace` is `None` when filtering removed the whole namespace.
    pub fn new(namespace: Option<&'a Namespace>, resolver: &'a dyn ReferenceResolver) -> Self {
        Self {
            namespace,
            resolver,
        }
    }

    /// Produce the tree. An empty object if there is no namespace.
    pub fn generate(&self) -> Value {
        let Some(ns) = self.namespace else {
            debug!("no namespace to document");
            return Value::Object(Map::new());
        };
        debug!(
            namespace = %ns.name,
            types = ns.types.len(),
            functions = ns.functions.len(),
            events = ns.events.len(),
            "generating documentation tree"
        );

        let types: Vec<Value> = ns
            .types
            .iter()
            .filter(|t| !t.kind.is_additional_properties())
            .map(|t| self.generate_type(t))
            .collect();

        json!({
            "name": ns.name,
            "types": types,
            "functions": self.generate_functions(&ns.functions),
            "events": self.generate_events(&ns.events),
            "properties": self.generate_properties(&ns.properties),
        })
    }

    fn namespace_name(&self) -> &str {
        self.namespace.map(|ns| ns.name.as_str()).unwrap_or_default()
    }

    /// Format a description, rewriting `$ref:` tokens into links.
    pub fn format_description(&self, description: Option<&str>) -> Value {
        match format_description(self.namespace_name(), self.resolver, description) {
            Some(text) => Value::String(text.into_owned()),
            None => Value::Null,
        }
    }

    pub(crate) fn link(&self, token: &str) -> Value {
        self.resolver.resolve(self.namespace_name(), token).into()
    }

    fn generate_type(&self, ty: &Type) -> Value {
        trace!(name = %ty.simple_name, "type");
        let mut dict = Map::new();
        dict.insert("name".into(), json!(ty.simple_name));
        dict.insert("description".into(), self.format_description(ty.description.as_deref()));
        dict.insert("properties".into(), self.generate_properties(&ty.properties));
        dict.insert("functions".into(), self.generate_functions(&ty.functions));
        dict.insert("events".into(), self.generate_events(&ty.events));
        dict.insert("id".into(), json!(build_id(ty, IdPrefix::Type)));
        dict.extend(self.render_type_info(&ty.kind, ty.instance_of.as_deref()));
        Value::Object(dict)
    }

    fn generate_functions(&self, functions: &[Function]) -> Value {
        functions.iter().map(|f| self.generate_function(f)).collect()
    }

    fn generate_function(&self, function: &Function) -> Value {
        trace!(name = %function.simple_name, "function");
        let (parameters, callback) = self.parameters_with_callback(&function.params, function.callback.as_ref());
        let returns = match &function.returns {
            Some(ret) => self.generate_property(ret),
            None => Value::Null,
        };

        json!({
            "name": function.simple_name,
            "description": self.format_description(function.description.as_deref()),
            "callback": callback,
            "parameters": parameters,
            "returns": returns,
            "id": build_id(function, IdPrefix::Method),
            "parent_name": function.parent.node_name(),
        })
    }

    fn generate_events(&self, events: &[Event]) -> Value {
        events.iter().map(|e| self.generate_event(e)).collect()
    }

    fn generate_event(&self, event: &Event) -> Value {
        trace!(name = %event.simple_name, "event");
        let (parameters, callback) = self.parameters_with_callback(&event.params, event.callback.as_ref());
        let conditions: Vec<Value> = event.conditions.iter().map(|c| self.link(c)).collect();
        let actions: Vec<Value> = event.actions.iter().map(|a| self.link(a)).collect();
        let filters: Vec<Value> = event.filters.iter().map(|f| self.generate_property(f)).collect();

        json!({
            "name": event.simple_name,
            "description": self.format_description(event.description.as_deref()),
            "parameters": parameters,
            "callback": callback,
            "conditions": conditions,
            "actions": actions,
            "filters": filters,
            "supportsRules": event.supports_rules,
            "id": build_id(event, IdPrefix::Event),
            "parent_name": event.parent.node_name(),
        })
    }

    /// Render params, append the callback (if any) and tag the last entry.
    ///
    /// The returned callback is the same node that closes the parameter
    /// list, so it carries the `last` marker as well.
    fn parameters_with_callback(&self, params: &[Property], callback: Option<&Callback>) -> (Vec<Value>, Value) {
        let mut parameters: Vec<Value> = params.iter().map(|p| self.generate_property(p)).collect();
        if let Some(cb) = callback {
            parameters.push(self.generate_callback(cb));
        }
        let parameters = with_last_marker(parameters);
        let callback = match callback {
            Some(_) => parameters.last().cloned().unwrap_or(Value::Null),
            None => Value::Null,
        };
        (parameters, callback)
    }

    fn generate_callback(&self, callback: &Callback) -> Value {
        let parameters: Vec<Value> = callback.params.iter().map(|p| self.generate_property(p)).collect();
        json!({
            "name": callback.simple_name,
            "optional": callback.optional,
            "description": self.format_description(callback.description.as_deref()),
            "properties": [],
            "functions": [],
            "id": build_id(callback, IdPrefix::Property),
            "parent_name": callback.parent.node_name(),
            "simple_type": "function",
            "parameters": with_last_marker(parameters),
        })
    }

    fn generate_properties(&self, properties: &[Property]) -> Value {
        properties
            .iter()
            .filter(|p| !p.kind.is_additional_properties())
            .map(|p| self.generate_property(p))
            .collect()
    }

    /// Render one property, recursing into nested members.
    pub fn generate_property(&self, property: &Property) -> Value {
        let mut dict = Map::new();
        dict.insert("name".into(), json!(property.simple_name));
        dict.insert("optional".into(), json!(property.optional));
        dict.insert("description".into(), self.format_description(property.description.as_deref()));
        dict.insert("properties".into(), self.generate_properties(&property.properties));
        dict.insert("functions".into(), self.generate_functions(&property.functions));
        dict.insert("id".into(), json!(build_id(property, IdPrefix::Property)));
        dict.insert("parent_name".into(), json!(property.parent.node_name()));
        match &property.value {
            Some(value) => {
                dict.insert("value".into(), format_value(value));
            }
            None => dict.extend(self.render_type_info(&property.kind, property.instance_of.as_deref())),
        }
        Value::Object(dict)
    }
}
