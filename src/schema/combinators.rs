//! Union of alternative schemas.
//!
//! ```rust
//! use joshinkan::{Schema, SchemaLike, ValuePath};
//! use serde_json::json;
//!
//! let number = Schema::union([Schema::integer(), Schema::float()]);
//! assert!(number.validate(&json!(5), &ValuePath::root()).is_success());
//! assert!(number.validate(&json!(5.0), &ValuePath::root()).is_success());
//! assert!(number.validate(&json!("5"), &ValuePath::root()).is_failure());
//! ```

use serde_json::Value;
use stillwater::Validation;

use crate::path::ValuePath;
use crate::ValidationResult;

use super::messages;
use super::traits::SchemaLike;

/// Accepts a value that satisfies at least one alternative.
///
/// Alternatives are tried in declaration order and the first success wins.
/// When none matches, the individual failures are discarded and a single
/// failure naming every alternative is reported instead.
pub struct UnionSchema {
    variants: Vec<Box<dyn SchemaLike>>,
}

impl UnionSchema {
    pub fn new(variants: Vec<Box<dyn SchemaLike>>) -> Self {
        Self { variants }
    }

    /// Appends an alternative, tried after the existing ones.
    pub fn or<S>(mut self, variant: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.variants.push(Box::new(variant));
        self
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    fn expected(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.describe()).collect()
    }
}

impl SchemaLike for UnionSchema {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        for variant in &self.variants {
            if variant.validate(value, path).is_success() {
                return Validation::Success(());
            }
        }
        Validation::Failure(messages::no_variant_matched(value, &self.expected(), path))
    }

    fn describe(&self) -> String {
        format!("one of [{}]", self.expected().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_first_success_wins() {
        let schema = Schema::union([Schema::integer(), Schema::float()]);
        assert!(schema.validate(&json!(5), &ValuePath::root()).is_success());
        assert!(schema.validate(&json!(5.0), &ValuePath::root()).is_success());
    }

    #[test]
    fn test_aggregate_failure_without_path() {
        let schema = Schema::union([Schema::integer(), Schema::float()]);
        let failure = schema
            .validate(&json!("hi"), &ValuePath::root())
            .into_result()
            .unwrap_err();

        assert_eq!(failure.location(), None);
        assert_eq!(failure.code, "no_variant_matched");
        assert!(failure.message.contains("value hi has an unexpected type of str"));
        assert!(failure.message.contains("Expected one of [int, float]"));
    }

    #[test]
    fn test_aggregate_failure_with_path() {
        let schema = Schema::union([Schema::integer(), Schema::float()]);
        let path = ValuePath::from_key("hello").push_key("there");
        let failure = schema.validate(&json!("hi"), &path).into_result().unwrap_err();

        assert_eq!(failure.location().as_deref(), Some("hello.there"));
        assert!(failure
            .message
            .contains("value hi at 'hello.there' has an unexpected type of str"));
    }

    #[test]
    fn test_or_appends_variant() {
        let schema = UnionSchema::new(Vec::new()).or(Schema::string());
        assert_eq!(schema.len(), 1);
        assert!(schema.validate(&json!("x"), &ValuePath::root()).is_success());
    }

    #[test]
    fn test_empty_union_rejects_everything() {
        let schema = UnionSchema::new(Vec::new());
        assert!(schema.is_empty());
        assert!(schema.validate(&json!(null), &ValuePath::root()).is_failure());
    }
}
