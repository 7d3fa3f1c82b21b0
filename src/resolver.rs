//! Reference resolution: reference token → link descriptor.
//!
//! Tokens look like `Name`, `Type.member` or `namespace.Name`. Generation
//! only ever calls [`ReferenceResolver::resolve`], which must not fail; a
//! token nothing knows about still yields a usable (possibly broken) link.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::ids::{compose_id, IdPrefix};
use crate::model::{Event, Function, Namespace, Property};

/// Navigable link to a schema entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

impl From<Link> for Value {
    fn from(link: Link) -> Self {
        json!(link)
    }
}

/// Maps a reference token, seen from inside `namespace`, to a link.
///
/// Shared read-only across generations, hence `Send + Sync`.
pub trait ReferenceResolver: Send + Sync {
    fn resolve(&self, namespace: &str, token: &str) -> Link;
}

/// Resolver that links every token to a type anchor by naming convention.
///
/// - `ns.Name` in namespace `ns` → `#type-Name`
/// - `Name` → `#type-Name`
/// - `api.Name` → `api.html#type-Name`
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeLinkResolver;

impl ReferenceResolver for TypeLinkResolver {
    fn resolve(&self, namespace: &str, token: &str) -> Link {
        if let Some(name) = token
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('.'))
        {
            return Link {
                href: format!("#type-{}", name),
                text: name.to_string(),
            };
        }
        match token.rsplit_once('.') {
            None => Link {
                href: format!("#type-{}", token),
                text: token.to_string(),
            },
            Some((api, name)) => Link {
                href: format!("{}.html#type-{}", api, name),
                text: token.to_string(),
            },
        }
    }
}

/// Index of every documentable node across a set of namespaces.
///
/// Anchors are the same ids tree generation assigns, so links land on the
/// rendered node. Unknown tokens fall back to [`TypeLinkResolver`].
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    /// namespace name → dotted node path → anchor id
    namespaces: HashMap<String, HashMap<String, String>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `namespaces`.
    pub fn from_namespaces<'a, I>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = &'a Namespace>,
    {
        let mut index = Self::new();
        for ns in namespaces {
            index.add_namespace(ns);
        }
        index
    }

    /// Index one namespace. Earlier entries win when names collide, with
    /// types taking precedence over functions, events and properties.
    pub fn add_namespace(&mut self, ns: &Namespace) {
        let symbols = self.namespaces.entry(ns.name.clone()).or_default();
        for ty in &ns.types {
            insert(symbols, &ty.simple_name, IdPrefix::Type, None);
            index_members(
                symbols,
                &ty.simple_name,
                &ty.properties,
                &ty.functions,
                &ty.events,
            );
        }
        index_members(symbols, "", &ns.properties, &ns.functions, &ns.events);
    }

    /// Number of indexed symbols across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strictly resolve `token` as seen from `namespace`.
    pub fn lookup(&self, namespace: &str, token: &str) -> Result<Link> {
        if self.namespaces.contains_key(token) {
            return Ok(Link {
                href: format!("{}.html", token),
                text: token.to_string(),
            });
        }

        let (api, path) = self.split_namespace(namespace, token);
        let anchor = self
            .namespaces
            .get(api)
            .and_then(|symbols| symbols.get(path))
            .ok_or_else(|| Error::UnresolvedReference {
                namespace: namespace.to_string(),
                token: token.to_string(),
            })?;

        if api == namespace {
            Ok(Link {
                href: format!("#{}", anchor),
                text: path.to_string(),
            })
        } else {
            Ok(Link {
                href: format!("{}.html#{}", api, anchor),
                text: token.to_string(),
            })
        }
    }

    /// Split a token into (namespace, node path), preferring the longest
    /// known namespace prefix and defaulting to the current namespace.
    fn split_namespace<'t>(&self, namespace: &'t str, token: &'t str) -> (&'t str, &'t str) {
        let mut best: Option<(&str, &str)> = None;
        for (i, _) in token.match_indices('.') {
            let (api, rest) = (&token[..i], &token[i + 1..]);
            if self.namespaces.contains_key(api) {
                best = Some((api, rest));
            }
        }
        best.unwrap_or((namespace, token))
    }
}

impl ReferenceResolver for SymbolIndex {
    fn resolve(&self, namespace: &str, token: &str) -> Link {
        match self.lookup(namespace, token) {
            Ok(link) => link,
            Err(err) => {
                warn!(%err, "falling back to type link");
                TypeLinkResolver.resolve(namespace, token)
            }
        }
    }
}

fn insert(
    symbols: &mut HashMap<String, String>,
    path: &str,
    prefix: IdPrefix,
    parent: Option<&str>,
) {
    let name = path.rsplit('.').next().unwrap_or(path);
    symbols
        .entry(path.to_string())
        .or_insert_with(|| compose_id(prefix, parent, name));
}

fn index_members(
    symbols: &mut HashMap<String, String>,
    base: &str,
    properties: &[Property],
    functions: &[Function],
    events: &[Event],
) {
    let parent = (!base.is_empty()).then_some(base);
    let join = |name: &str| match parent {
        Some(base) => format!("{}.{}", base, name),
        None => name.to_string(),
    };
    let owner = parent.map(|base| base.rsplit('.').next().unwrap_or(base));

    for func in functions {
        insert(symbols, &join(&func.simple_name), IdPrefix::Method, owner);
    }
    for event in events {
        insert(symbols, &join(&event.simple_name), IdPrefix::Event, owner);
    }
    for prop in properties {
        if prop.kind.is_additional_properties() {
            continue;
        }
        let path = join(&prop.simple_name);
        insert(symbols, &path, IdPrefix::Property, owner);
        index_members(symbols, &path, &prop.properties, &prop.functions, &[]);
    }
}
