//! Errors raised while constructing a schema from a declaration.

use thiserror::Error;

/// A schema declaration is malformed.
///
/// These are programming errors in route setup and surface at construction
/// time, never while validating a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("a schema should be a flat mapping: field '{field}' is declared as a nested mapping, declare it as {{\"schema\": {{...}}}} instead")]
    NestedMapping { field: String },

    #[error("unknown type name '{name}'")]
    UnknownType { name: String },

    #[error("{kind} is not allowed as a key schema")]
    InvalidKeySchema { kind: String },

    #[error("malformed declaration: {0}")]
    Malformed(String),
}
