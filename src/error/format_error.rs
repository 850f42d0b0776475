//! Errors raised while splitting a multipart/form-data body.

use thiserror::Error;

/// A multipart body (or its `Content-Type`) could not be parsed.
///
/// Parsing is all-or-nothing: on any of these the caller gets no form data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("could not parse 'boundary' from content type: boundary not found in '{content_type}'")]
    BoundaryNotFound { content_type: String },

    #[error("insufficient parts: boundary not found in body: {boundary}")]
    InsufficientParts { boundary: String },

    #[error("invalid end boundary")]
    InvalidEndBoundary,

    #[error("missing content-disposition: part {part} does not specify a content disposition header")]
    MissingContentDisposition { part: usize },

    /// The disposition header exists but carries no parsable field name.
    #[error("could not parse name from content-disposition header: {header}")]
    MalformedDisposition { header: String },

    /// The same field was sent both as `name` and as `name[]`.
    #[error("field '{name}' was sent both as a single value and as a list")]
    ConflictingField { name: String },
}

impl FormatError {
    /// True for conditions that a well-formed header can never produce.
    ///
    /// These are reported as server faults rather than client errors.
    pub fn is_internal(&self) -> bool {
        matches!(self, FormatError::MalformedDisposition { .. })
    }
}
