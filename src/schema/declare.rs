//! Building schemas from declarations held as data.
//!
//! A declaration is a JSON object mapping field names to field declarations.
//! A field name ending in `?` is optional. A field declaration is either a
//! type name (`"str"`, `"int"`, `"float"`, `"bool"`, `"null"`, `"list"`,
//! `"dict"`, `"any"`) or a single-key combinator:
//!
//! | combinator | payload |
//! |---|---|
//! | `list_of` | element declaration |
//! | `dict_of` | `{"key": decl, "value": decl, "allow_empty": bool}` |
//! | `values` | array of allowed literals |
//! | `any_of` | array of declarations |
//! | `nullable` | declaration |
//! | `schema` | nested field map |
//!
//! Schemas must stay flat: a field declared as a plain mapping is rejected,
//! nested records have to be spelled out with `schema`. A single-key mapping
//! named after a combinator only counts as one when its payload has the shape
//! above, so `{"values": {"a": "int"}}` is still a plain mapping.
//!
//! ```rust
//! use joshinkan::schema::declare::from_declaration;
//! use joshinkan::{DefinitionError, SchemaLike, ValuePath};
//! use serde_json::json;
//!
//! let schema = from_declaration(&json!({
//!     "first_name": "str",
//!     "nickname?": "str",
//!     "child_age": {"list_of": "str"},
//!     "privacy": {"values": ["on"]},
//! }))
//! .unwrap();
//!
//! let form = json!({"first_name": "Dad", "child_age": ["17"], "privacy": "on"});
//! assert!(schema.validate(&form, &ValuePath::root()).is_success());
//!
//! let nested = from_declaration(&json!({"region": {"a": "int", "b": "int"}}));
//! assert!(matches!(nested, Err(DefinitionError::NestedMapping { .. })));
//! ```

use serde_json::{Map, Value};

use crate::error::DefinitionError;

use super::traits::SchemaLike;
use super::{Kind, ObjectSchema, Schema, UnionSchema};

const COMBINATORS: [&str; 6] = ["list_of", "dict_of", "values", "any_of", "nullable", "schema"];

const DICT_OPTIONS: [&str; 3] = ["key", "value", "allow_empty"];

/// Builds an [`ObjectSchema`] from a field map declaration.
///
/// # Errors
///
/// Returns a [`DefinitionError`] describing the first malformed field.
pub fn from_declaration(declaration: &Value) -> Result<ObjectSchema, DefinitionError> {
    let fields = declaration.as_object().ok_or_else(|| {
        DefinitionError::Malformed(format!("expected a field map, got {}", declaration))
    })?;
    object(fields, "")
}

fn object(fields: &Map<String, Value>, parent: &str) -> Result<ObjectSchema, DefinitionError> {
    let mut schema = ObjectSchema::new();
    for (raw_name, field_decl) in fields {
        let (name, required) = match raw_name.strip_suffix('?') {
            Some(name) => (name, false),
            None => (raw_name.as_str(), true),
        };
        let qualified = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", parent, name)
        };

        let node = node(field_decl, &qualified)?;
        schema = if required {
            schema.field(name, node)
        } else {
            schema.optional(name, node)
        };
    }
    Ok(schema)
}

fn node(decl: &Value, field: &str) -> Result<Box<dyn SchemaLike>, DefinitionError> {
    match decl {
        Value::String(name) => {
            let kind = Kind::from_name(name)
                .ok_or_else(|| DefinitionError::UnknownType { name: name.clone() })?;
            Ok(Box::new(Schema::of(kind)))
        }
        Value::Object(map) => match combinator(map) {
            Some((tag, payload)) => combinator_node(tag, payload, field),
            None => Err(DefinitionError::NestedMapping {
                field: field.to_string(),
            }),
        },
        other => Err(DefinitionError::Malformed(format!(
            "field '{}' is declared as {}, expected a type name or a combinator",
            field, other
        ))),
    }
}

fn combinator(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    if map.len() != 1 {
        return None;
    }
    let (tag, payload) = map.iter().next()?;
    let fits = match (tag.as_str(), payload) {
        ("values" | "any_of", Value::Object(_)) => false,
        ("dict_of", Value::Object(options)) => {
            !options.is_empty() && options.keys().all(|key| DICT_OPTIONS.contains(&key.as_str()))
        }
        (tag, _) => COMBINATORS.contains(&tag),
    };
    fits.then_some((tag.as_str(), payload))
}

fn combinator_node(
    tag: &str,
    payload: &Value,
    field: &str,
) -> Result<Box<dyn SchemaLike>, DefinitionError> {
    match tag {
        "list_of" => Ok(Box::new(Schema::list_of(node(payload, field)?))),
        "nullable" => Ok(Box::new(Schema::nullable(node(payload, field)?))),
        "values" => {
            let allowed = payload.as_array().ok_or_else(|| {
                DefinitionError::Malformed(format!("'values' of field '{}' must be an array", field))
            })?;
            Ok(Box::new(Schema::values(allowed.iter().cloned())))
        }
        "any_of" => {
            let variants = payload.as_array().ok_or_else(|| {
                DefinitionError::Malformed(format!("'any_of' of field '{}' must be an array", field))
            })?;
            let variants = variants
                .iter()
                .map(|variant| node(variant, field))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(UnionSchema::new(variants)))
        }
        "schema" => {
            let fields = payload.as_object().ok_or_else(|| {
                DefinitionError::Malformed(format!("'schema' of field '{}' must be a field map", field))
            })?;
            Ok(Box::new(object(fields, field)?))
        }
        "dict_of" => dict_node(payload, field),
        other => Err(DefinitionError::Malformed(format!("unknown combinator '{}'", other))),
    }
}

fn dict_node(payload: &Value, field: &str) -> Result<Box<dyn SchemaLike>, DefinitionError> {
    let options = payload.as_object().ok_or_else(|| {
        DefinitionError::Malformed(format!("'dict_of' of field '{}' must be a mapping", field))
    })?;
    let key_decl = options.get("key").ok_or_else(|| {
        DefinitionError::Malformed(format!("'dict_of' of field '{}' has no 'key'", field))
    })?;
    let value_decl = options.get("value").ok_or_else(|| {
        DefinitionError::Malformed(format!("'dict_of' of field '{}' has no 'value'", field))
    })?;
    let allow_empty = match options.get("allow_empty") {
        None => true,
        Some(Value::Bool(allow)) => *allow,
        Some(other) => {
            return Err(DefinitionError::Malformed(format!(
                "'allow_empty' of field '{}' must be a boolean, got {}",
                field, other
            )))
        }
    };

    if let Some(map) = key_decl.as_object() {
        if let Some((tag @ ("schema" | "dict_of" | "nullable"), _)) = combinator(map) {
            return Err(DefinitionError::InvalidKeySchema {
                kind: tag.to_string(),
            });
        }
    }

    let key = node(key_decl, field)?;
    let value = node(value_decl, field)?;
    Ok(Box::new(Schema::dict_of(key, value).allow_empty(allow_empty)))
}
