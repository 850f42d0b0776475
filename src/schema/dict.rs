//! Homogeneous mapping validation.

use serde_json::Value;
use stillwater::Validation;

use crate::path::ValuePath;
use crate::ValidationResult;

use super::messages;
use super::traits::SchemaLike;

/// Requires a mapping whose keys and values each satisfy a schema.
///
/// Keys are presented to the key schema as strings, since that is all a
/// decoded request can contain. Entries are checked in the mapping's own
/// order; both key and value failures are reported at `parent.<key>` and the
/// first bad entry stops validation.
///
/// # Example
///
/// ```rust
/// use joshinkan::{Schema, SchemaLike, ValuePath};
/// use serde_json::json;
///
/// let schema = Schema::dict_of(Schema::string(), Schema::integer()).allow_empty(false);
///
/// assert!(schema.validate(&json!({"a": 1}), &ValuePath::root()).is_success());
///
/// let failure = schema.validate(&json!({}), &ValuePath::root()).into_result().unwrap_err();
/// assert!(failure.message.contains("empty"));
/// assert_eq!(failure.location(), None);
/// ```
pub struct DictSchema<K, V> {
    key: K,
    value: V,
    allow_empty: bool,
}

impl<K: SchemaLike, V: SchemaLike> DictSchema<K, V> {
    /// Creates a mapping schema; empty mappings are accepted by default.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            allow_empty: true,
        }
    }

    /// Whether an empty mapping passes.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

impl<K: SchemaLike, V: SchemaLike> SchemaLike for DictSchema<K, V> {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        let Some(entries) = value.as_object() else {
            return Validation::Failure(messages::unexpected_type(value, "dict", path));
        };

        if !self.allow_empty && entries.is_empty() {
            return Validation::Failure(messages::empty_mapping(path));
        }

        for (key, entry) in entries {
            let entry_path = path.push_key(key.as_str());
            let key_value = Value::String(key.clone());

            if self.key.validate(&key_value, &ValuePath::root()).is_failure() {
                return Validation::Failure(messages::invalid_key(
                    &key_value,
                    &self.key.describe(),
                    entry_path,
                ));
            }

            if let Validation::Failure(failure) = self.value.validate(entry, &entry_path) {
                return Validation::Failure(failure);
            }
        }
        Validation::Success(())
    }

    fn describe(&self) -> String {
        format!("dict[{}, {}]", self.key.describe(), self.value.describe())
    }
}
