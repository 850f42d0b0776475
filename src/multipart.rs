//! multipart/form-data parsing for text form submissions.
//!
//! The body is expected to be decoded text already. Parts are found by
//! splitting on the boundary, so binary uploads are out of scope.
//!
//! Part bodies are rejoined with `\n` whatever line breaks the client sent.
//!
//! # Example
//!
//! ```rust
//! use joshinkan::multipart::{self, FormValue};
//!
//! let body = "--XyZ\r\n\
//!     Content-Disposition: form-data; name=\"first_name\"\r\n\
//!     \r\n\
//!     sven\r\n\
//!     --XyZ\r\n\
//!     Content-Disposition: form-data; name=\"child_first_name[]\"\r\n\
//!     \r\n\
//!     Boi\r\n\
//!     --XyZ\r\n\
//!     Content-Disposition: form-data; name=\"child_first_name[]\"\r\n\
//!     \r\n\
//!     Girl\r\n\
//!     --XyZ--\r\n";
//!
//! let form = multipart::parse(body, "multipart/form-data; boundary=XyZ").unwrap();
//! assert_eq!(form.text("first_name"), Some("sven"));
//! assert_eq!(
//!     form.get("child_first_name"),
//!     Some(&FormValue::List(vec!["Boi".to_string(), "Girl".to_string()]))
//! );
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::FormatError;

/// Suffix marking a repeated field.
const LIST_SUFFIX: &str = "[]";

/// The closing delimiter is `--<boundary>--`; after splitting on
/// `--<boundary>` only the trailing dashes remain.
const CLOSING: &str = "--";

fn boundary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^multipart/form-data;\s*boundary=(?P<boundary>.+)$")
            .expect("boundary pattern is valid")
    })
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^form-data;\s?name\s?=\s?"(?P<name>.+)"$"#).expect("name pattern is valid")
    })
}

/// The value of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// A field sent without the `[]` suffix; the last occurrence wins.
    Text(String),
    /// A field sent as `name[]`, in submission order.
    List(Vec<String>),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            FormValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FormValue::Text(_) => None,
            FormValue::List(items) => Some(items),
        }
    }
}

impl From<&FormValue> for Value {
    fn from(value: &FormValue) -> Self {
        match value {
            FormValue::Text(text) => Value::String(text.clone()),
            FormValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// Parsed form fields keyed by name (without any `[]` suffix), in the order
/// they first appeared in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: IndexMap<String, FormValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.get(name)
    }

    /// The field's value if it was sent as a single value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormValue::as_text)
    }

    /// The field's values if it was sent as a list.
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FormValue::as_list)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The form as a JSON object of strings and string arrays, ready for
    /// schema validation.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value)))
            .collect();
        Value::Object(map)
    }

    fn set_text(&mut self, name: &str, text: String) -> Result<(), FormatError> {
        if let Some(FormValue::List(_)) = self.fields.get(name) {
            return Err(FormatError::ConflictingField {
                name: name.to_string(),
            });
        }
        self.fields.insert(name.to_string(), FormValue::Text(text));
        Ok(())
    }

    fn push_list(&mut self, name: &str, item: String) -> Result<(), FormatError> {
        match self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FormValue::List(Vec::new()))
        {
            FormValue::List(items) => {
                items.push(item);
                Ok(())
            }
            FormValue::Text(_) => Err(FormatError::ConflictingField {
                name: name.to_string(),
            }),
        }
    }
}

/// Parses a multipart/form-data `body` using the boundary from `content_type`.
///
/// # Errors
///
/// Fails without returning any fields when the boundary is missing from the
/// header, the body holds fewer than two segments, the closing delimiter is
/// wrong, or a part lacks a usable `Content-Disposition` header.
pub fn parse(body: &str, content_type: &str) -> Result<FormData, FormatError> {
    let boundary = boundary_pattern()
        .captures(content_type)
        .and_then(|captures| captures.name("boundary"))
        .map(|m| m.as_str())
        .filter(|boundary| !boundary.is_empty())
        .ok_or_else(|| FormatError::BoundaryNotFound {
            content_type: content_type.to_string(),
        })?;

    let delimiter = format!("--{}", boundary);
    let chunks: Vec<&str> = body
        .split(delimiter.as_str())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect();

    if chunks.len() < 2 {
        return Err(FormatError::InsufficientParts {
            boundary: boundary.to_string(),
        });
    }

    let (closing, parts) = chunks
        .split_last()
        .ok_or(FormatError::InvalidEndBoundary)?;
    if *closing != CLOSING {
        return Err(FormatError::InvalidEndBoundary);
    }

    let mut form = FormData::new();
    for (index, chunk) in parts.iter().enumerate() {
        let (name, content) = parse_part(index, chunk)?;
        match name.strip_suffix(LIST_SUFFIX) {
            Some(stripped) => form.push_list(stripped, content)?,
            None => form.set_text(name, content)?,
        }
    }
    Ok(form)
}

/// Splits one part into its field name and its body.
fn parse_part(index: usize, chunk: &str) -> Result<(&str, String), FormatError> {
    let mut lines = split_lines(chunk).into_iter();
    let mut headers = HashMap::new();

    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or(FormatError::MissingContentDisposition { part: index })?;
        headers.insert(key.to_lowercase(), value.trim());
    }

    let disposition = headers
        .get("content-disposition")
        .copied()
        .ok_or(FormatError::MissingContentDisposition { part: index })?;

    let name = name_pattern()
        .captures(disposition)
        .and_then(|captures| captures.name("name"))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| FormatError::MalformedDisposition {
            header: disposition.to_string(),
        })?;

    let content = lines.collect::<Vec<_>>().join("\n");
    Ok((name, content))
}

/// Splits on every Unicode line boundary, treating `\r\n` as one break.
/// A trailing break does not produce an empty last line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        let width = match c {
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => {
                chars.next();
                2
            }
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}'
            | '\u{2029}' => c.len_utf8(),
            _ => continue,
        };
        lines.push(&text[start..at]);
        start = at + width;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
