//! In-page anchor identifiers for documented nodes.
//!
//! Ids are `<prefix>-<parent>-<name>` for nested nodes and `<prefix>-<name>`
//! for nodes owned by the namespace. Only the immediate parent contributes,
//! so sibling nodes of one kind must have distinct names.

use crate::model::Node;

/// Fixed id prefix per node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Type,
    Method,
    Event,
    Property,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Type => "type",
            IdPrefix::Method => "method",
            IdPrefix::Event => "event",
            IdPrefix::Property => "property",
        }
    }
}

/// Build the anchor id for `node`.
pub fn build_id<N: Node + ?Sized>(node: &N, prefix: IdPrefix) -> String {
    compose_id(prefix, node.parent().node_name(), node.simple_name())
}

/// Build an id from its parts. `parent` is `None` for namespace-level nodes.
pub fn compose_id(prefix: IdPrefix, parent: Option<&str>, simple_name: &str) -> String {
    match parent {
        Some(parent) => format!("{}-{}-{}", prefix.as_str(), parent, simple_name),
        None => format!("{}-{}", prefix.as_str(), simple_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parent, Property, PropertyType, Type};

    #[test]
    fn top_level_type() {
        let ty = Type {
            simple_name: "Foo".into(),
            parent: Parent::Namespace,
            ..Default::default()
        };
        assert_eq!(build_id(&ty, IdPrefix::Type), "type-Foo");
    }

    #[test]
    fn nested_property() {
        let prop = Property::new("bar", Parent::Node("Foo".into()), PropertyType::default());
        assert_eq!(build_id(&prop, IdPrefix::Property), "property-Foo-bar");
    }

    #[test]
    fn detached_node() {
        let prop = Property::new("bar", Parent::None, PropertyType::default());
        assert_eq!(build_id(&prop, IdPrefix::Property), "property-bar");
    }

    #[test]
    fn deterministic() {
        let a = compose_id(IdPrefix::Method, Some("Tab"), "reload");
        let b = compose_id(IdPrefix::Method, Some("Tab"), "reload");
        assert_eq!(a, b);
        assert_eq!(a, "method-Tab-reload");
        assert_eq!(compose_id(IdPrefix::Event, None, "onCreated"), "event-onCreated");
    }
}
