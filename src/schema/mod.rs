//! Schema definitions for request validation.
//!
//! A schema is a tree of immutable nodes implementing [`SchemaLike`]. Leaves
//! check a value's [`Kind`] or membership in a literal set; combinators build
//! unions, lists, mappings and closed records out of other nodes. Validation
//! stops at the first offence and reports it as a [`crate::ValidationFailure`].
//!
//! # Example
//!
//! ```rust
//! use joshinkan::{Schema, SchemaLike, ValuePath};
//! use serde_json::json;
//!
//! let schema = Schema::object().field("foo", Schema::list_of(Schema::string()));
//!
//! assert!(schema.validate(&json!({"foo": ["a", "b"]}), &ValuePath::root()).is_success());
//!
//! let failure = schema
//!     .validate(&json!({"bar": 1}), &ValuePath::root())
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(failure.location().as_deref(), Some("foo"));
//! assert!(failure.message.contains("missing"));
//! ```

mod combinators;
pub mod declare;
mod dict;
mod leaf;
mod list;
pub(crate) mod messages;
mod object;
mod traits;

pub use combinators::UnionSchema;
pub use dict::DictSchema;
pub use leaf::{Kind, TypeSchema, ValuesSchema};
pub use list::ListSchema;
pub use object::ObjectSchema;
pub use traits::SchemaLike;

/// Entry point for building schemas.
pub struct Schema;

impl Schema {
    /// A value of the given kind.
    pub fn of(kind: Kind) -> TypeSchema {
        TypeSchema::new(kind)
    }

    pub fn string() -> TypeSchema {
        TypeSchema::new(Kind::String)
    }

    /// A JSON number without a fractional representation.
    pub fn integer() -> TypeSchema {
        TypeSchema::new(Kind::Integer)
    }

    pub fn float() -> TypeSchema {
        TypeSchema::new(Kind::Float)
    }

    pub fn boolean() -> TypeSchema {
        TypeSchema::new(Kind::Boolean)
    }

    pub fn null() -> TypeSchema {
        TypeSchema::new(Kind::Null)
    }

    /// Any list, elements unchecked. See [`Schema::list_of`].
    pub fn list() -> TypeSchema {
        TypeSchema::new(Kind::List)
    }

    /// Any mapping, entries unchecked. See [`Schema::dict_of`] and [`Schema::object`].
    pub fn dict() -> TypeSchema {
        TypeSchema::new(Kind::Dict)
    }

    pub fn any() -> TypeSchema {
        TypeSchema::new(Kind::Any)
    }

    /// One of an enumerated set of literal values.
    ///
    /// ```rust
    /// use joshinkan::{Schema, SchemaLike, ValuePath};
    /// use serde_json::json;
    ///
    /// let consent = Schema::values(["on"]);
    /// assert!(consent.validate(&json!("on"), &ValuePath::root()).is_success());
    /// assert!(consent.validate(&json!("off"), &ValuePath::root()).is_failure());
    /// ```
    pub fn values<I, V>(allowed: I) -> ValuesSchema
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        ValuesSchema::new(allowed)
    }

    /// The first matching alternative wins.
    ///
    /// Alternatives of different schema types can be mixed by boxing them as
    /// `Box<dyn SchemaLike>`.
    pub fn union<I, S>(variants: I) -> UnionSchema
    where
        I: IntoIterator<Item = S>,
        S: SchemaLike + 'static,
    {
        UnionSchema::new(
            variants
                .into_iter()
                .map(|variant| Box::new(variant) as Box<dyn SchemaLike>)
                .collect(),
        )
    }

    /// Shorthand for `union(null, schema)`.
    ///
    /// ```rust
    /// use joshinkan::{Schema, SchemaLike, ValuePath};
    /// use serde_json::json;
    ///
    /// let schema = Schema::nullable(Schema::string());
    /// assert!(schema.validate(&json!(null), &ValuePath::root()).is_success());
    /// assert!(schema.validate(&json!("x"), &ValuePath::root()).is_success());
    /// assert!(schema.validate(&json!(1), &ValuePath::root()).is_failure());
    /// ```
    pub fn nullable<S>(schema: S) -> UnionSchema
    where
        S: SchemaLike + 'static,
    {
        UnionSchema::new(vec![Box::new(Schema::null()), Box::new(schema)])
    }

    pub fn list_of<S: SchemaLike>(item: S) -> ListSchema<S> {
        ListSchema::new(item)
    }

    /// A mapping checked entry by entry; use `.allow_empty(false)` to reject `{}`.
    pub fn dict_of<K: SchemaLike, V: SchemaLike>(key: K, value: V) -> DictSchema<K, V> {
        DictSchema::new(key, value)
    }

    /// A closed record; add fields with `.field(..)` and `.optional(..)`.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }
}
