//! Flat, closed record validation.
//!
//! This module provides [`ObjectSchema`], the shape used for request
//! payloads: a fixed set of named fields, each required or optional.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::path::ValuePath;
use crate::ValidationResult;

use super::messages;
use super::traits::SchemaLike;

/// Definition of a field within an object schema.
struct FieldDef {
    schema: Box<dyn SchemaLike>,
    required: bool,
}

/// A schema for mappings with a declared set of keys.
///
/// Nested records are expressed as nested `ObjectSchema`s. Validation runs in
/// three passes and reports the first offence of the earliest pass:
///
/// 1. every required field must be present (declaration order),
/// 2. every key of the value must be declared (the value's own order),
/// 3. every declared field that is present must validate (declaration order).
///
/// # Example
///
/// ```rust
/// use joshinkan::{Schema, SchemaLike, ValuePath};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("first_name", Schema::string())
///     .optional("nickname", Schema::string())
///     .field("privacy", Schema::values(["on"]));
///
/// let result = schema.validate(
///     &json!({"first_name": "sven", "privacy": "on"}),
///     &ValuePath::root(),
/// );
/// assert!(result.is_success());
///
/// let failure = schema
///     .validate(&json!({"nickname": "x"}), &ValuePath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(failure.message, "The key 'first_name' is missing.");
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
}

impl ObjectSchema {
    /// Creates an object schema with no fields; it only accepts `{}`.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Adds a field that must be present.
    ///
    /// Redeclaring a name replaces the earlier definition but keeps its position.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: true,
            },
        );
        self
    }

    /// Adds a field that may be absent; when present it must validate.
    pub fn optional<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Some(true)` for a required field, `Some(false)` for an optional one.
    pub fn is_required(&self, name: &str) -> Option<bool> {
        self.fields.get(name).map(|def| def.required)
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.fields
                    .iter()
                    .map(|(name, def)| (name, if def.required { "required" } else { "optional" })),
            )
            .finish()
    }
}

impl SchemaLike for ObjectSchema {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        let Some(obj) = value.as_object() else {
            return Validation::Failure(messages::unexpected_type(value, "dict", path));
        };

        if let Some((name, _)) = self
            .fields
            .iter()
            .find(|(name, def)| def.required && !obj.contains_key(name.as_str()))
        {
            return Validation::Failure(messages::missing_key(path.push_key(name.as_str())));
        }

        if let Some(key) = obj.keys().find(|key| !self.fields.contains_key(key.as_str())) {
            return Validation::Failure(messages::unexpected_key(path.push_key(key.as_str())));
        }

        for (name, def) in &self.fields {
            let Some(field_value) = obj.get(name.as_str()) else {
                continue;
            };
            if let Validation::Failure(failure) =
                def.schema.validate(field_value, &path.push_key(name.as_str()))
            {
                return Validation::Failure(failure);
            }
        }

        Validation::Success(())
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self
            .fields
            .iter()
            .map(|(name, def)| {
                if def.required {
                    name.clone()
                } else {
                    format!("{}?", name)
                }
            })
            .collect();
        format!("schema({})", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn failure(result: ValidationResult) -> crate::ValidationFailure {
        result.into_result().unwrap_err()
    }

    #[test]
    fn test_empty_object_schema() {
        let schema = ObjectSchema::new();
        assert!(schema.is_empty());
        assert!(schema.validate(&json!({}), &ValuePath::root()).is_success());
        assert!(schema.validate(&json!({"a": 1}), &ValuePath::root()).is_failure());
    }

    #[test]
    fn test_not_a_dict() {
        let failure = failure(
            Schema::object()
                .field("a", Schema::integer())
                .validate(&json!(5), &ValuePath::root()),
        );

        assert_eq!(failure.location(), None);
        assert!(failure
            .message
            .contains("value 5 has an unexpected type of int. Expected dict."));
    }

    #[test]
    fn test_simple_record() {
        let schema = Schema::object()
            .field("a", Schema::integer())
            .field("b", Schema::string())
            .field("c", Schema::object());

        let result = schema.validate(&json!({"a": 1, "b": "hallo", "c": {}}), &ValuePath::root());
        assert!(result.is_success());
    }

    #[test]
    fn test_field_type_mismatch() {
        let failure = failure(
            Schema::object()
                .field("a", Schema::integer())
                .validate(&json!({"a": 1.0}), &ValuePath::root()),
        );

        assert_eq!(failure.location().as_deref(), Some("a"));
        assert!(failure
            .message
            .contains("value 1.0 at 'a' has an unexpected type of float. Expected int"));
    }

    #[test]
    fn test_missing_key() {
        let schema = Schema::object()
            .field("a", Schema::integer())
            .field("b", Schema::string())
            .field("c", Schema::any());

        let failure = failure(schema.validate(&json!({"a": 1, "b": "hallo"}), &ValuePath::root()));
        assert_eq!(failure.location().as_deref(), Some("c"));
        assert!(failure.message.contains("The key 'c' is missing"));
        assert_eq!(failure.code, "missing_key");
    }

    #[test]
    fn test_optional_field() {
        let schema = Schema::object()
            .field("a", Schema::integer())
            .optional("b", Schema::string());

        assert!(schema.validate(&json!({"a": 1, "b": "hallo"}), &ValuePath::root()).is_success());
        assert!(schema.validate(&json!({"a": 1}), &ValuePath::root()).is_success());

        let failure = failure(schema.validate(&json!({"a": 1, "b": 2}), &ValuePath::root()));
        assert_eq!(failure.location().as_deref(), Some("b"));
        assert!(failure
            .message
            .contains("value 2 at 'b' has an unexpected type of int. Expected str"));
    }

    #[test]
    fn test_unexpected_key() {
        let failure = failure(
            Schema::object()
                .field("a", Schema::integer())
                .validate(&json!({"a": 1, "b": 2}), &ValuePath::root()),
        );

        assert_eq!(failure.location().as_deref(), Some("b"));
        assert!(failure.message.contains("The key 'b' is not defined in the schema."));
    }

    #[test]
    fn test_missing_precedes_unexpected_precedes_values() {
        let schema = Schema::object()
            .field("a", Schema::string())
            .optional("b", Schema::string())
            .field("c", Schema::string());

        let missing = failure(schema.validate(&json!({"b": "x"}), &ValuePath::root()));
        assert_eq!(missing.location().as_deref(), Some("a"));
        assert_eq!(missing.code, "missing_key");

        let unexpected = failure(schema.validate(
            &json!({"a": 1, "c": "x", "zz": 1, "yy": 2}),
            &ValuePath::root(),
        ));
        assert_eq!(unexpected.location().as_deref(), Some("zz"));
        assert_eq!(unexpected.code, "unexpected_key");

        let typed = failure(schema.validate(&json!({"c": 2, "a": 1}), &ValuePath::root()));
        assert_eq!(typed.location().as_deref(), Some("a"));
        assert_eq!(typed.code, "invalid_type");
    }

    #[test]
    fn test_nested_schema() {
        let schema = Schema::object().field("region", Schema::object().field("a", Schema::integer()));
        assert!(schema.validate(&json!({"region": {"a": 1}}), &ValuePath::root()).is_success());

        let failure = failure(schema.validate(&json!({"region": {}}), &ValuePath::root()));
        assert_eq!(failure.location().as_deref(), Some("region.a"));
        assert_eq!(failure.message, "The key 'region.a' is missing.");
    }

    #[test]
    fn test_introspection() {
        let schema = Schema::object()
            .field("a", Schema::integer())
            .optional("b", Schema::string());

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(schema.is_required("a"), Some(true));
        assert_eq!(schema.is_required("b"), Some(false));
        assert_eq!(schema.is_required("c"), None);
        assert_eq!(schema.describe(), "schema(a, b?)");
    }
}
