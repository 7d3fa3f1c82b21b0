//! Raw schema JSON → typed [`Namespace`].
//!
//! Property kind precedence: `$ref`, then `enum` (string-valued), then
//! `type`, then `choices`, then a literal `value`. Types use the same order
//! and default to `object`.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::*;

type Object = Map<String, Value>;

const ADDITIONAL_PROPERTIES: &str = "additionalProperties";

/// Build the typed model for one (already filtered) namespace object.
pub fn parse_namespace(json: &Value) -> Result<Namespace> {
    let obj = as_object(json, "<root>")?;
    let name = obj
        .get("namespace")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::config("<root>", "missing `namespace`"))?
        .to_string();

    let ctx = Context { namespace: &name };
    let types = list(obj, "types", &name)?
        .iter()
        .enumerate()
        .map(|(i, t)| ctx.parse_type(t, &format!("{}.types[{}]", name, i)))
        .collect::<Result<Vec<_>>>()?;
    let functions = ctx.parse_functions(obj, &Parent::Namespace, &name)?;
    let events = ctx.parse_events(obj, &Parent::Namespace, &name)?;
    let properties = ctx.parse_properties(obj, &Parent::Namespace, &name)?;

    Ok(Namespace {
        name,
        types,
        functions,
        events,
        properties,
    })
}

struct Context<'a> {
    namespace: &'a str,
}

impl Context<'_> {
    /// `demo.Widget` → `Widget` inside namespace `demo`.
    fn simple_name(&self, name: &str) -> String {
        name.strip_prefix(self.namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name)
            .to_string()
    }

    fn parse_type(&self, json: &Value, path: &str) -> Result<Type> {
        let obj = as_object(json, path)?;
        let id = required_str(obj, "id", path)?;
        let simple_name = self.simple_name(id);
        let me = Parent::Node(simple_name.clone());

        let kind = self
            .parse_kind(obj, id, &me, path)?
            .unwrap_or(PropertyType::Primitive(Primitive::Object));
        let mut properties = self.parse_properties(obj, &me, path)?;
        push_additional_properties(obj, &me, &mut properties);

        Ok(Type {
            functions: self.parse_functions(obj, &me, path)?,
            events: self.parse_events(obj, &me, path)?,
            simple_name,
            parent: Parent::Namespace,
            description: opt_str(obj, "description"),
            kind,
            instance_of: opt_str(obj, "isInstanceOf"),
            properties,
        })
    }

    /// Kind from `$ref`, `enum`, `type` or `choices`; `None` if none apply.
    fn parse_kind(&self, obj: &Object, name: &str, me: &Parent, path: &str) -> Result<Option<PropertyType>> {
        if let Some(reference) = obj.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| Error::config(path, "`$ref` must be a string"))?;
            return Ok(Some(PropertyType::Ref(reference.to_string())));
        }

        let type_name = match obj.get("type") {
            Some(t) => Some(
                t.as_str()
                    .ok_or_else(|| Error::config(path, "`type` must be a string"))?,
            ),
            None => None,
        };

        // Integer "enums" are legal-value lists and keep their numeric type.
        if let Some(values) = obj.get("enum") {
            if matches!(type_name, None | Some("string")) {
                return enum_values(values, path).map(|v| Some(PropertyType::Enum(v)));
            }
        }

        if let Some(type_name) = type_name {
            return self.parse_type_name(type_name, obj, name, me, path).map(Some);
        }

        if let Some(choices) = obj.get("choices") {
            return self.parse_choices(choices, name, me, path).map(Some);
        }

        Ok(None)
    }

    fn parse_type_name(
        &self,
        type_name: &str,
        obj: &Object,
        name: &str,
        me: &Parent,
        path: &str,
    ) -> Result<PropertyType> {
        match type_name {
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| Error::config(path, "array without `items`"))?;
                let item = self.parse_property(
                    &format!("{}Element", name),
                    items,
                    me.clone(),
                    &format!("{}.items", path),
                )?;
                Ok(PropertyType::Array(Box::new(item)))
            }
            "function" => Ok(PropertyType::Function),
            other => Primitive::from_schema(other)
                .map(PropertyType::Primitive)
                .ok_or_else(|| Error::config(path, format!("unknown type `{}`", other))),
        }
    }

    fn parse_choices(&self, choices: &Value, name: &str, me: &Parent, path: &str) -> Result<PropertyType> {
        let items = choices
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| Error::config(path, "`choices` must be a non-empty list"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let mut choice =
                    self.parse_property(name, choice, me.clone(), &format!("{}.choices[{}]", path, i))?;
                // Any single alternative may be absent.
                choice.optional = true;
                Ok(choice)
            })
            .collect::<Result<Vec<_>>>()
            .map(PropertyType::Choices)
    }

    fn parse_property(&self, name: &str, json: &Value, parent: Parent, path: &str) -> Result<Property> {
        let obj = as_object(json, path)?;
        let full_name = obj.get("name").and_then(Value::as_str).unwrap_or(name);
        let simple_name = self.simple_name(full_name);
        let me = Parent::Node(simple_name.clone());

        let mut prop = Property {
            properties: self.parse_properties(obj, &me, path)?,
            simple_name,
            parent,
            description: opt_str(obj, "description"),
            optional: opt_bool(obj, "optional"),
            instance_of: opt_str(obj, "isInstanceOf"),
            ..Default::default()
        };

        // A literal value is kept even when a type is declared alongside it.
        prop.value = obj.get("value").cloned();
        prop.kind = match (self.parse_kind(obj, full_name, &me, path)?, &prop.value) {
            (Some(kind), _) => kind,
            (None, Some(value)) => value_kind(value),
            (None, None) => {
                return Err(Error::config(
                    path,
                    "property has no `type`, `$ref`, `choices` or `value`",
                ))
            }
        };

        if prop.kind == PropertyType::Primitive(Primitive::Object) {
            prop.functions = self.parse_functions(obj, &me, path)?;
            push_additional_properties(obj, &me, &mut prop.properties);
        } else if prop.kind == PropertyType::Function {
            prop.params = self.parse_param_list(obj, &me, path)?;
            prop.returns = self.parse_returns(obj, &me, path)?;
        }

        Ok(prop)
    }

    fn parse_properties(&self, obj: &Object, parent: &Parent, path: &str) -> Result<Vec<Property>> {
        let Some(props) = obj.get("properties") else {
            return Ok(Vec::new());
        };
        as_object(props, path)?
            .iter()
            .map(|(name, json)| {
                self.parse_property(name, json, parent.clone(), &format!("{}.properties.{}", path, name))
            })
            .collect()
    }

    fn parse_functions(&self, obj: &Object, parent: &Parent, path: &str) -> Result<Vec<Function>> {
        list(obj, "functions", path)?
            .iter()
            .enumerate()
            .map(|(i, f)| self.parse_function(f, parent.clone(), &format!("{}.functions[{}]", path, i)))
            .collect()
    }

    fn parse_function(&self, json: &Value, parent: Parent, path: &str) -> Result<Function> {
        let obj = as_object(json, path)?;
        let simple_name = self.simple_name(required_str(obj, "name", path)?);
        let me = Parent::Node(simple_name.clone());
        let (params, callback) = self.parse_parameters(obj, &me, path)?;

        Ok(Function {
            returns: self.parse_returns(obj, &me, path)?,
            simple_name,
            parent,
            description: opt_str(obj, "description"),
            params,
            callback,
        })
    }

    fn parse_events(&self, obj: &Object, parent: &Parent, path: &str) -> Result<Vec<Event>> {
        list(obj, "events", path)?
            .iter()
            .enumerate()
            .map(|(i, e)| self.parse_event(e, parent.clone(), &format!("{}.events[{}]", path, i)))
            .collect()
    }

    fn parse_event(&self, json: &Value, parent: Parent, path: &str) -> Result<Event> {
        let obj = as_object(json, path)?;
        let simple_name = self.simple_name(required_str(obj, "name", path)?);
        let me = Parent::Node(simple_name.clone());
        let (params, callback) = self.parse_parameters(obj, &me, path)?;
        let filters = list(obj, "filters", path)?
            .iter()
            .enumerate()
            .map(|(i, f)| self.parse_param(f, &me, &format!("{}.filters[{}]", path, i)))
            .collect::<Result<Vec<_>>>()?;

        let options = match obj.get("options") {
            Some(options) => Some(as_object(options, path)?),
            None => None,
        };
        let (conditions, actions, supports_rules) = match options {
            Some(options) => (
                string_list(options, "conditions", path)?,
                string_list(options, "actions", path)?,
                opt_bool(options, "supportsRules"),
            ),
            None => (Vec::new(), Vec::new(), false),
        };

        Ok(Event {
            simple_name,
            parent,
            description: opt_str(obj, "description"),
            params,
            filters,
            callback,
            conditions,
            actions,
            supports_rules,
        })
    }

    /// Split `parameters` into ordinary params and the trailing callback.
    ///
    /// Only the last function-typed parameter is the callback; earlier ones
    /// are kept as ordinary params at the position the next one appeared.
    fn parse_parameters(&self, obj: &Object, me: &Parent, path: &str) -> Result<(Vec<Property>, Option<Callback>)> {
        let mut params = Vec::new();
        let mut callback: Option<(String, &Value)> = None;

        for (i, param) in list(obj, "parameters", path)?.iter().enumerate() {
            let param_path = format!("{}.parameters[{}]", path, i);
            if param.get("type").and_then(Value::as_str) == Some("function") {
                if let Some((prev_path, prev)) = callback.replace((param_path, param)) {
                    params.push(self.parse_param(prev, me, &prev_path)?);
                }
            } else {
                params.push(self.parse_param(param, me, &param_path)?);
            }
        }

        let callback = callback
            .map(|(cb_path, json)| self.parse_callback(json, me.clone(), &cb_path))
            .transpose()?;
        Ok((params, callback))
    }

    fn parse_param_list(&self, obj: &Object, me: &Parent, path: &str) -> Result<Vec<Property>> {
        list(obj, "parameters", path)?
            .iter()
            .enumerate()
            .map(|(i, p)| self.parse_param(p, me, &format!("{}.parameters[{}]", path, i)))
            .collect()
    }

    fn parse_param(&self, json: &Value, parent: &Parent, path: &str) -> Result<Property> {
        let name = json
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::config(path, "parameter without `name`"))?;
        self.parse_property(name, json, parent.clone(), path)
    }

    fn parse_callback(&self, json: &Value, parent: Parent, path: &str) -> Result<Callback> {
        let obj = as_object(json, path)?;
        let simple_name = self.simple_name(required_str(obj, "name", path)?);
        let me = Parent::Node(simple_name.clone());

        Ok(Callback {
            params: self.parse_param_list(obj, &me, path)?,
            simple_name,
            parent,
            description: opt_str(obj, "description"),
            optional: opt_bool(obj, "optional"),
        })
    }

    fn parse_returns(&self, obj: &Object, me: &Parent, path: &str) -> Result<Option<Box<Property>>> {
        obj.get("returns")
            .map(|json| {
                self.parse_property("return", json, me.clone(), &format!("{}.returns", path))
                    .map(Box::new)
            })
            .transpose()
    }
}

/// Record a wildcard-properties marker so it can be recognized (and skipped)
/// downstream.
fn push_additional_properties(obj: &Object, me: &Parent, properties: &mut Vec<Property>) {
    let present = obj
        .get(ADDITIONAL_PROPERTIES)
        .is_some_and(|v| !matches!(v, Value::Null | Value::Bool(false)));
    if present {
        properties.push(Property::new(
            ADDITIONAL_PROPERTIES,
            me.clone(),
            PropertyType::AdditionalProperties,
        ));
    }
}

fn value_kind(value: &Value) -> PropertyType {
    let primitive = match value {
        Value::Number(n) if n.is_f64() => Primitive::Double,
        Value::Number(_) => Primitive::Integer,
        Value::String(_) => Primitive::String,
        Value::Bool(_) => Primitive::Boolean,
        _ => Primitive::Any,
    };
    PropertyType::Primitive(primitive)
}

fn enum_values(values: &Value, path: &str) -> Result<Vec<String>> {
    let items = values
        .as_array()
        .ok_or_else(|| Error::config(path, "`enum` must be a list"))?;
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Object(o) => o
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::config(path, "enum entry without `name`")),
            _ => Err(Error::config(path, "unsupported enum entry")),
        })
        .collect()
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Object> {
    value
        .as_object()
        .ok_or_else(|| Error::config(path, "expected an object"))
}

fn list<'v>(obj: &'v Object, key: &str, path: &str) -> Result<&'v [Value]> {
    match obj.get(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(Error::config(path, format!("`{}` must be a list", key))),
    }
}

fn required_str<'v>(obj: &'v Object, key: &str, path: &str) -> Result<&'v str> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::config(path, format!("missing `{}`", key)))
}

fn opt_str(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn opt_bool(obj: &Object, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn string_list(obj: &Object, key: &str, path: &str) -> Result<Vec<String>> {
    list(obj, key, path)?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::config(path, format!("`{}` entries must be strings", key)))
        })
        .collect()
}
