//! Error and failure types.
//!
//! [`ValidationFailure`] is the verdict of a schema that did not match.
//! [`FormatError`] and [`DefinitionError`] are real errors: an unparsable
//! multipart body and a malformed schema declaration respectively.

mod definition_error;
mod failure;
mod format_error;

pub use definition_error::DefinitionError;
pub use failure::ValidationFailure;
pub use format_error::FormatError;
