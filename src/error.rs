//! Error types for schema loading and reference lookup.

use thiserror::Error;

/// Errors produced by the schema compiler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The raw schema is malformed: a required key is missing or a value is
    /// outside the accepted set. Fatal; never recovered internally.
    #[error("invalid schema at {path}: {reason}")]
    Configuration {
        /// Dotted location of the offending node (e.g. `demo.types[2]`).
        path: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A reference token names nothing known to the resolver.
    ///
    /// Only the strict [`SymbolIndex::lookup`](crate::resolver::SymbolIndex::lookup)
    /// returns this; tree generation always degrades to a best-effort link.
    #[error("unresolved reference `{token}` in namespace `{namespace}`")]
    UnresolvedReference {
        /// Namespace the token was resolved against.
        namespace: String,
        /// The raw token.
        token: String,
    },
}

impl Error {
    pub(crate) fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
