//! schemadoc — compile API schema namespaces into documentation trees.
//!
//! The pipeline for one namespace:
//!
//! 1. [`nodoc::filter`] drops every subtree marked `nodoc` from the raw JSON.
//! 2. [`parser::schema::parse_namespace`] builds the typed [`model`].
//! 3. [`render::Generator`] walks the model and emits a plain
//!    [`serde_json::Value`] tree for templates, resolving `$ref:` tokens
//!    through a [`resolver::ReferenceResolver`].
//!
//! Everything here is pure: no IO, no shared mutable state.

pub mod error;
pub mod ids;
pub mod model;
pub mod nodoc;
pub mod parser;
pub mod render;
pub mod resolver;

pub use error::{Error, Result};
pub use model::Namespace;
pub use render::Generator;
pub use resolver::{Link, ReferenceResolver, SymbolIndex, TypeLinkResolver};

use serde_json::Value;

/// Filter, parse and render one raw namespace object.
///
/// Returns `{}` when the namespace itself is marked `nodoc`.
pub fn generate(raw: &Value, resolver: &dyn ReferenceResolver) -> Result<Value> {
    let namespace = parser::load_namespace(raw)?;
    Ok(Generator::new(namespace.as_ref(), resolver).generate())
}
