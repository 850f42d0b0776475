//! Failure constructors shared by every schema type.
//!
//! Message wording is relied upon by clients and tests, keep it stable.

use serde_json::Value;

use crate::error::ValidationFailure;
use crate::path::ValuePath;

/// Runtime type name of a JSON value, in the vocabulary of [`super::Kind`].
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Strings render bare, everything else as compact JSON.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn unexpected_type(value: &Value, expected: &str, path: &ValuePath) -> ValidationFailure {
    let message = match path.location() {
        None => format!(
            "The value {} has an unexpected type of {}. Expected {}.",
            render(value),
            type_name(value),
            expected
        ),
        Some(location) => format!(
            "The value {} at '{}' has an unexpected type of {}. Expected {}.",
            render(value),
            location,
            type_name(value),
            expected
        ),
    };
    ValidationFailure::new(path.clone(), message)
        .with_code("invalid_type")
        .with_got(type_name(value))
        .with_expected(expected)
}

pub(crate) fn no_variant_matched(
    value: &Value,
    expected: &[String],
    path: &ValuePath,
) -> ValidationFailure {
    let expected = format!("[{}]", expected.join(", "));
    let message = match path.location() {
        None => format!(
            "The value {} has an unexpected type of {}. Expected one of {}.",
            render(value),
            type_name(value),
            expected
        ),
        Some(location) => format!(
            "The value {} at '{}' has an unexpected type of {}. Expected one of {}.",
            render(value),
            location,
            type_name(value),
            expected
        ),
    };
    ValidationFailure::new(path.clone(), message)
        .with_code("no_variant_matched")
        .with_got(type_name(value))
        .with_expected(format!("one of {}", expected))
}

pub(crate) fn unexpected_value(value: &Value, allowed: &str, path: &ValuePath) -> ValidationFailure {
    let message = match path.location() {
        None => format!("The value is {}. Expected one of {}.", render(value), allowed),
        Some(location) => format!(
            "The value of '{}' is {}. Expected one of {}.",
            location,
            render(value),
            allowed
        ),
    };
    ValidationFailure::new(path.clone(), message)
        .with_code("invalid_value")
        .with_got(render(value))
        .with_expected(allowed)
}

pub(crate) fn missing_key(path: ValuePath) -> ValidationFailure {
    let message = format!("The key '{}' is missing.", path);
    ValidationFailure::new(path, message)
        .with_code("missing_key")
        .with_expected("value")
}

pub(crate) fn unexpected_key(path: ValuePath) -> ValidationFailure {
    let message = format!("The key '{}' is not defined in the schema.", path);
    ValidationFailure::new(path, message).with_code("unexpected_key")
}

pub(crate) fn empty_mapping(path: &ValuePath) -> ValidationFailure {
    let message = match path.location() {
        None => "The dict cannot be empty.".to_string(),
        Some(location) => format!("The dict at '{}' cannot be empty.", location),
    };
    ValidationFailure::new(path.clone(), message)
        .with_code("empty_mapping")
        .with_expected("non-empty dict")
}

pub(crate) fn invalid_key(key: &Value, expected: &str, path: ValuePath) -> ValidationFailure {
    let message = format!(
        "The key at '{}' has an unexpected type of {}. Expected {}.",
        path,
        type_name(key),
        expected
    );
    ValidationFailure::new(path, message)
        .with_code("invalid_key")
        .with_got(render(key))
        .with_expected(expected)
}
