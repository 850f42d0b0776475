//! Locators for values inside nested request payloads.
//!
//! A [`ValuePath`] is built incrementally while a schema descends into a value,
//! so that a failure can point at the exact member that did not conform,
//! e.g. `children[1].first_name`.

use std::fmt::{self, Display};

/// One step of a [`ValuePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (e.g. `email`).
    Key(String),
    /// A sequence position (e.g. `[0]`).
    Index(usize),
}

/// The location of a value relative to the validation root.
///
/// The root path renders as an empty string; [`ValuePath::location`] maps it to
/// `None` so callers can tell "at the root" apart from "at key ''".
///
/// # Example
///
/// ```rust
/// use joshinkan::ValuePath;
///
/// let path = ValuePath::root()
///     .push_key("children")
///     .push_index(2)
///     .push_key("age");
///
/// assert_eq!(path.to_string(), "children[2].age");
/// assert_eq!(ValuePath::root().location(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    /// The validation root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path consisting of a single key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.into())],
        }
    }

    /// Returns a new path with `key` appended; `self` is left untouched.
    pub fn push_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Returns a new path with `index` appended; `self` is left untouched.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// The rendered path, or `None` at the root.
    pub fn location(&self) -> Option<String> {
        if self.is_root() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", key)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
