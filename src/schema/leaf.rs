//! Leaf schemas: type matches and enumerated value sets.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::Validation;

use crate::path::ValuePath;
use crate::ValidationResult;

use super::messages;
use super::traits::SchemaLike;

/// The closed set of value kinds a [`TypeSchema`] can require.
///
/// `Integer` and `Float` follow the representation of the decoded JSON number:
/// `1` is an integer, `1.0` is a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    List,
    Dict,
    /// Matches every value.
    Any,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "str",
            Kind::Integer => "int",
            Kind::Float => "float",
            Kind::Boolean => "bool",
            Kind::Null => "null",
            Kind::List => "list",
            Kind::Dict => "dict",
            Kind::Any => "any",
        }
    }

    /// Looks a kind up by its [`Kind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "str" => Kind::String,
            "int" => Kind::Integer,
            "float" => Kind::Float,
            "bool" => Kind::Boolean,
            "null" => Kind::Null,
            "list" => Kind::List,
            "dict" => Kind::Dict,
            "any" => Kind::Any,
            _ => return None,
        };
        Some(kind)
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Integer => value.is_i64() || value.is_u64(),
            Kind::Float => value.is_f64(),
            Kind::Boolean => value.is_boolean(),
            Kind::Null => value.is_null(),
            Kind::List => value.is_array(),
            Kind::Dict => value.is_object(),
            Kind::Any => true,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requires the value to be of a given [`Kind`].
///
/// # Example
///
/// ```rust
/// use joshinkan::{Schema, SchemaLike, ValuePath};
/// use serde_json::json;
///
/// let schema = Schema::list();
/// assert!(schema.validate(&json!([]), &ValuePath::root()).is_success());
/// assert!(schema.validate(&json!(5), &ValuePath::root()).is_failure());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSchema {
    kind: Kind,
}

impl TypeSchema {
    pub fn new(kind: Kind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl SchemaLike for TypeSchema {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        if self.kind.matches(value) {
            Validation::Success(())
        } else {
            Validation::Failure(messages::unexpected_type(value, self.kind.name(), path))
        }
    }

    fn describe(&self) -> String {
        self.kind.name().to_string()
    }
}

/// Requires the value to equal one of an enumerated set of literals.
///
/// Comparison is structural equality on the decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesSchema {
    allowed: Vec<Value>,
}

impl ValuesSchema {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

impl SchemaLike for ValuesSchema {
    fn validate(&self, value: &Value, path: &ValuePath) -> ValidationResult {
        if self.allowed.contains(value) {
            Validation::Success(())
        } else {
            Validation::Failure(messages::unexpected_value(value, &self.describe(), path))
        }
    }

    fn describe(&self) -> String {
        let rendered: Vec<String> = self.allowed.iter().map(Value::to_string).collect();
        format!("({})", rendered.join(", "))
    }
}
