//! Typed schema model — the validated input to tree generation.
//!
//! A [`Namespace`] exclusively owns every node beneath it. Nodes point back at
//! their enclosing node through [`Parent`], which records only the parent's
//! simple name, so there are no owning or counted back-references.

use serde_json::Value;

/// Non-owning link from a node to whatever encloses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Parent {
    /// Detached node (constructed outside any namespace).
    #[default]
    None,
    /// Directly owned by the namespace root.
    Namespace,
    /// Nested under another node, identified by its simple name.
    Node(String),
}

impl Parent {
    /// Simple name of the enclosing node, unless that is the namespace itself.
    pub fn node_name(&self) -> Option<&str> {
        match self {
            Parent::Node(name) => Some(name),
            Parent::None | Parent::Namespace => None,
        }
    }
}

/// Anything with a name and a place in the tree.
pub trait Node {
    fn simple_name(&self) -> &str;
    fn parent(&self) -> &Parent;
}

macro_rules! impl_node {
    ($($ty:ty),*) => {
        $(impl Node for $ty {
            fn simple_name(&self) -> &str {
                &self.simple_name
            }
            fn parent(&self) -> &Parent {
                &self.parent
            }
        })*
    };
}

impl_node!(Type, Function, Event, Callback, Property);

/// Scalar and object kinds that render as a bare type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Primitive {
    #[default]
    Any,
    Binary,
    Boolean,
    Double,
    Integer,
    Int64,
    Object,
    String,
}

impl Primitive {
    /// Map a schema `type` string onto a primitive.
    ///
    /// `array` and `function` are not primitives and return `None`.
    pub fn from_schema(name: &str) -> Option<Self> {
        match name {
            "any" => Some(Primitive::Any),
            "binary" => Some(Primitive::Binary),
            "boolean" => Some(Primitive::Boolean),
            "number" => Some(Primitive::Double),
            "integer" => Some(Primitive::Integer),
            "int64" => Some(Primitive::Int64),
            "object" => Some(Primitive::Object),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Any => "any",
            Primitive::Binary => "binary",
            Primitive::Boolean => "boolean",
            Primitive::Double => "double",
            Primitive::Integer => "integer",
            Primitive::Int64 => "int64",
            Primitive::Object => "object",
            Primitive::String => "string",
        }
    }
}

/// The closed set of type kinds a property (or type) can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    Primitive(Primitive),
    /// Named reference to another schema entity.
    Ref(String),
    /// Homogeneous list; the payload describes one element.
    Array(Box<Property>),
    /// One of several alternatives, in declaration order.
    Choices(Vec<Property>),
    Enum(Vec<String>),
    /// Wildcard-properties marker. Never documented.
    AdditionalProperties,
    Function,
}

impl Default for PropertyType {
    fn default() -> Self {
        PropertyType::Primitive(Primitive::Any)
    }
}

impl PropertyType {
    /// Canonical lower-case name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Primitive(p) => p.as_str(),
            PropertyType::Ref(_) => "ref",
            PropertyType::Array(_) => "array",
            PropertyType::Choices(_) => "choices",
            PropertyType::Enum(_) => "enum",
            PropertyType::AdditionalProperties => "additional_properties",
            PropertyType::Function => "function",
        }
    }

    pub fn is_additional_properties(&self) -> bool {
        matches!(self, PropertyType::AdditionalProperties)
    }
}

/// A namespace: the root of one documented API surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub types: Vec<Type>,
    pub functions: Vec<Function>,
    pub events: Vec<Event>,
    pub properties: Vec<Property>,
}

/// A named type declared by a namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Type {
    pub simple_name: String,
    pub parent: Parent,
    pub description: Option<String>,
    pub kind: PropertyType,
    /// `isInstanceOf` override shown instead of the kind name.
    pub instance_of: Option<String>,
    pub properties: Vec<Property>,
    pub functions: Vec<Function>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Function {
    pub simple_name: String,
    pub parent: Parent,
    pub description: Option<String>,
    pub params: Vec<Property>,
    pub callback: Option<Callback>,
    pub returns: Option<Box<Property>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub simple_name: String,
    pub parent: Parent,
    pub description: Option<String>,
    pub params: Vec<Property>,
    pub filters: Vec<Property>,
    pub callback: Option<Callback>,
    /// Reference tokens naming declarative conditions.
    pub conditions: Vec<String>,
    /// Reference tokens naming declarative actions.
    pub actions: Vec<String>,
    pub supports_rules: bool,
}

/// Function-shaped trailing parameter of a function or event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    pub simple_name: String,
    pub parent: Parent,
    pub description: Option<String>,
    pub optional: bool,
    pub params: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub simple_name: String,
    pub parent: Parent,
    pub description: Option<String>,
    pub optional: bool,
    pub kind: PropertyType,
    pub instance_of: Option<String>,
    /// Members of an object-shaped property.
    pub properties: Vec<Property>,
    pub functions: Vec<Function>,
    /// Parameters of a function-typed property.
    pub params: Vec<Property>,
    pub returns: Option<Box<Property>>,
    /// Literal constant; when present the type is not rendered.
    pub value: Option<Value>,
}

impl Property {
    pub fn new(simple_name: impl Into<String>, parent: Parent, kind: PropertyType) -> Self {
        Property {
            simple_name: simple_name.into(),
            parent,
            kind,
            ..Default::default()
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_name_skips_namespace() {
        assert_eq!(Parent::Namespace.node_name(), None);
        assert_eq!(Parent::None.node_name(), None);
        assert_eq!(Parent::Node("Foo".into()).node_name(), Some("Foo"));
    }

    #[test]
    fn primitive_names() {
        assert_eq!(Primitive::from_schema("number"), Some(Primitive::Double));
        assert_eq!(Primitive::from_schema("array"), None);
        assert_eq!(PropertyType::Primitive(Primitive::Int64).name(), "int64");
        assert_eq!(PropertyType::Function.name(), "function");
    }

    #[test]
    fn value_marks_property() {
        let mut prop = Property::new("count", Parent::Namespace, PropertyType::default());
        assert!(!prop.has_value());
        prop.value = Some(Value::from(3));
        assert!(prop.has_value());
    }
}
