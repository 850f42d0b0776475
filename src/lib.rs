//! # Joshinkan
//!
//! Request validation and form handling for the Joshinkan Werder karate club
//! backend.
//!
//! ## Overview
//!
//! Incoming data is checked against declarative schemas that stop at the first
//! offence and report a single human-readable message together with the
//! location of the offending value. Browser forms arrive as
//! `multipart/form-data` and are decoded into [`FormData`] before validation.
//! A small in-process router ties both together for the trial-registration
//! endpoint.
//!
//! ## Core Types
//!
//! - [`ValuePath`]: Location of a value inside a nested structure (e.g., `children[1].name`)
//! - [`ValidationFailure`]: The first offence found, with its location and message
//! - [`Schema`]: Entry point for creating validation schemas
//! - [`FormData`]: Decoded multipart form fields
//!
//! ## Example
//!
//! ```rust
//! use joshinkan::{Schema, SchemaLike, ValuePath};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("first_name", Schema::string())
//!     .optional("age", Schema::string());
//!
//! let result = schema.validate(&json!({"first_name": "sven"}), &ValuePath::root());
//! assert!(result.is_success());
//!
//! let failure = schema
//!     .validate(&json!({"first_name": "sven", "belt": "white"}), &ValuePath::root())
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(failure.message, "The key 'belt' is not defined in the schema.");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod mail;
pub mod multipart;
pub mod path;
pub mod routes;
pub mod schema;

pub use error::{DefinitionError, FormatError, ValidationFailure};
pub use multipart::{FormData, FormValue};
pub use path::{PathSegment, ValuePath};
pub use schema::{
    DictSchema, Kind, ListSchema, ObjectSchema, Schema, SchemaLike, TypeSchema, UnionSchema,
    ValuesSchema,
};

/// Outcome of validating one value: success, or the first failure found.
pub type ValidationResult = stillwater::Validation<(), ValidationFailure>;
