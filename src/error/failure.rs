//! The verdict payload of a failed schema validation.

use std::fmt::{self, Display};

use crate::path::ValuePath;

/// Why a value did not conform to a schema, and where.
///
/// A failure is an ordinary result value, not an error condition of the
/// validator itself: the HTTP layer turns it into a 400 response whose body
/// carries [`ValidationFailure::message`].
///
/// # Example
///
/// ```rust
/// use joshinkan::{ValidationFailure, ValuePath};
///
/// let failure = ValidationFailure::new(ValuePath::from_key("email"), "The key 'email' is missing.")
///     .with_code("missing_key");
///
/// assert_eq!(failure.location().as_deref(), Some("email"));
/// assert_eq!(failure.code, "missing_key");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Where the offending value sits; the root path means the subject itself.
    pub path: ValuePath,
    /// Human-readable description, safe to hand back to the client.
    pub message: String,
    /// Rendering of the offending value, if there was one.
    pub got: Option<String>,
    /// Description of what the schema expected.
    pub expected: Option<String>,
    /// Machine-readable failure kind (e.g. `missing_key`).
    pub code: String,
}

impl ValidationFailure {
    pub fn new(path: ValuePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// The rendered path, or `None` when the failure is at the root.
    pub fn location(&self) -> Option<String> {
        self.path.location()
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "(root): {}", self.message),
        }
    }
}

impl std::error::Error for ValidationFailure {}

// Schemas are shared between request threads; their verdicts cross threads too.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationFailure>();
    assert_sync::<ValidationFailure>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_defaults() {
        let failure = ValidationFailure::new(ValuePath::from_key("a"), "nope");

        assert_eq!(failure.path, ValuePath::from_key("a"));
        assert_eq!(failure.message, "nope");
        assert_eq!(failure.code, "validation_error");
        assert!(failure.got.is_none());
        assert!(failure.expected.is_none());
    }

    #[test]
    fn test_failure_builder() {
        let failure = ValidationFailure::new(ValuePath::root(), "bad")
            .with_code("invalid_type")
            .with_got("int")
            .with_expected("list");

        assert_eq!(failure.code, "invalid_type");
        assert_eq!(failure.got.as_deref(), Some("int"));
        assert_eq!(failure.expected.as_deref(), Some("list"));
        assert_eq!(failure.location(), None);
    }

    #[test]
    fn test_display_prefixes_location() {
        let at_key = ValidationFailure::new(ValuePath::from_key("privacy"), "is off");
        assert_eq!(at_key.to_string(), "privacy: is off");

        let at_root = ValidationFailure::new(ValuePath::root(), "not a dict");
        assert_eq!(at_root.to_string(), "(root): not a dict");
    }
}
