//! Homogeneous sequence validation.

use serde_json::Value;
use stillwater::Validation;

use crate::path::ValuePath;
use crate::ValidationResult;

use super::messages;
use super::traits::SchemaLike;

/// Requires a list whose every element satisfies the item schema.
///
/// Elements are checked in order and validation stops at the first bad one,
/// reported at `parent[i]`. An empty list always passes.
///
/// # Example
///
/// ```rust
/// use joshinkan::{Schema, SchemaLike, ValuePath};
/// use serde_json::json;
///
/// let schema = Schema::list_of(Schema::integer());
///
/// let failure = schema
///     .validate(&json!([1, "x", "y"]), &ValuePath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(failure.location().as_deref(), Some("[1]"));
/// ```
pub struct ListSchema<S> {
    item: S,
}

impl<S: SchemaLike> ListSchema<S> {
    pub fn new(item: S) -> Self {
        Self { item }
    }

    pub fn item(&self) -> &S {
        &self.item
    }
}

impl<S: SchemaLike> SchemaLike for ListSchema<S> {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        let Some(items) = value.as_array() else {
            return Validation::Failure(messages::unexpected_type(value, "list", path));
        };

        for (index, item) in items.iter().enumerate() {
            if let Validation::Failure(failure) = self.item.validate(item, &path.push_index(index)) {
                return Validation::Failure(failure);
            }
        }
        Validation::Success(())
    }

    fn describe(&self) -> String {
        format!("list[{}]", self.item.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_list_of_kinds() {
        let ints = Schema::list_of(Schema::integer());
        assert!(ints.validate(&json!([1, 2, 3]), &ValuePath::root()).is_success());
        assert!(ints.validate(&json!([]), &ValuePath::root()).is_success());

        let strings = Schema::list_of(Schema::string());
        assert!(strings.validate(&json!(["test"]), &ValuePath::root()).is_success());
    }

    #[test]
    fn test_list_of_values() {
        let schema = Schema::list_of(Schema::values([1, 2, 3]));
        assert!(schema.validate(&json!([1, 1, 2]), &ValuePath::root()).is_success());
        assert!(schema.validate(&json!([1, 4]), &ValuePath::root()).is_failure());
    }

    #[test]
    fn test_bad_element_without_path() {
        let failure = Schema::list_of(Schema::integer())
            .validate(&json!(["test"]), &ValuePath::root())
            .into_result()
            .unwrap_err();

        assert_eq!(failure.location().as_deref(), Some("[0]"));
        assert!(failure
            .message
            .contains("value test at '[0]' has an unexpected type of str. Expected int"));
    }

    #[test]
    fn test_bad_element_with_path() {
        let path = ValuePath::from_key("hello").push_key("there");
        let failure = Schema::list_of(Schema::integer())
            .validate(&json!([3, "test"]), &path)
            .into_result()
            .unwrap_err();

        assert_eq!(failure.location().as_deref(), Some("hello.there[1]"));
        assert!(failure.message.contains("Expected int"));
    }

    #[test]
    fn test_not_a_list() {
        let schema = Schema::list_of(Schema::integer());

        let root = schema.validate(&json!(2), &ValuePath::root()).into_result().unwrap_err();
        assert_eq!(root.location(), None);
        assert!(root.message.contains("value 2 has an unexpected type of int"));
        assert!(root.message.contains("Expected list"));

        let nested = schema
            .validate(&json!(2), &ValuePath::from_key("hello"))
            .into_result()
            .unwrap_err();
        assert_eq!(nested.location().as_deref(), Some("hello"));
    }

    #[test]
    fn test_stops_at_first_bad_element() {
        let failure = Schema::list_of(Schema::integer())
            .validate(&json!([1, "x", "y"]), &ValuePath::root())
            .into_result()
            .unwrap_err();

        assert_eq!(failure.location().as_deref(), Some("[1]"));
        assert!(failure.message.contains("value x"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Schema::list_of(Schema::float()).describe(), "list[float]");
    }
}
