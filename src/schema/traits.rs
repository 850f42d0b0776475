//! The trait every schema node implements.

use std::sync::Arc;

use serde_json::Value;

use crate::path::ValuePath;
use crate::ValidationResult;

/// A node of a schema tree.
///
/// Nodes are immutable after construction and hold no per-call state, so one
/// schema can be validated against concurrently from many request threads.
/// Validation is a pure traversal: the same `(schema, value)` pair always
/// yields the same verdict.
///
/// # Example
///
/// ```rust
/// use joshinkan::{Schema, SchemaLike, ValuePath};
/// use serde_json::json;
///
/// let nodes: Vec<Box<dyn SchemaLike>> = vec![
///     Box::new(Schema::string()),
///     Box::new(Schema::list_of(Schema::integer())),
/// ];
///
/// assert!(nodes[1].validate(&json!([1, 2]), &ValuePath::root()).is_success());
/// assert_eq!(nodes[1].describe(), "list[int]");
/// ```
pub trait SchemaLike: Send + Sync {
    /// Checks `value`, located at `path`, against this node.
    ///
    /// Stops at the first offending member; the failure carries its path.
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult;

    /// Short description of what this node accepts, used in failure messages.
    fn describe(&self) -> String;
}

impl<S: SchemaLike + ?Sized> SchemaLike for Box<S> {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        (**self).validate(value, path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: SchemaLike + ?Sized> SchemaLike for Arc<S> {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        (**self).validate(value, path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
