//! A small in-process HTTP layer: requests, responses, routing and
//! request-validation middleware.
//!
//! There is no socket handling here. A front end builds a [`Request`], hands
//! it to [`App::handle`] and writes the returned [`Response`] back out.

mod middleware;
mod router;

use std::fmt::{self, Display};
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::FormatError;
use crate::multipart::{self, FormData};

pub use middleware::{
    expect_form_data, expect_json, expect_params, expect_schema, with_context, ValidationSource,
    UNPARSABLE_BODY,
};
pub use router::{App, Handler, HandlerError, HandlerResult, RouteTable, RouterError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Head,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request method outside the supported set, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported method '{0}'")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "HEAD" => Ok(Method::Head),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

/// Renders as a status line, e.g. `404 Not Found`.
impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// An incoming request.
///
/// Header names are stored lower-cased; repeated headers are joined with `,`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    query: String,
    headers: IndexMap<String, String>,
    body: String,
}

impl Request {
    /// A request for `target`, which may carry a `?query`. The path part is
    /// percent-decoded, the query is kept raw for [`Request::parameters`].
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path: decode_path(path),
            query: query.to_string(),
            headers: IndexMap::new(),
            body: String::new(),
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(Method::Get, target)
    }

    pub fn post(target: &str) -> Self {
        Self::new(Method::Post, target)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let value = value.trim();
        self.headers
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `body` and marks the request as JSON.
    pub fn with_json(self, body: &Value) -> Self {
        self.with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The query string as a JSON object.
    ///
    /// Keys sent once map to a string, repeated keys to a list of strings.
    /// Pairs without a value are dropped.
    ///
    /// ```rust
    /// use joshinkan::http::Request;
    /// use serde_json::json;
    ///
    /// let request = Request::get("/search?name=sven+mkw&belt=white&belt=yellow&empty=");
    /// assert_eq!(
    ///     request.parameters(),
    ///     json!({"name": "sven mkw", "belt": ["white", "yellow"]})
    /// );
    /// ```
    pub fn parameters(&self) -> Value {
        parse_query(&self.query)
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The body decoded as multipart form data.
    pub fn form_data(&self) -> Result<FormData, FormatError> {
        multipart::parse(&self.body, self.content_type().unwrap_or_default())
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Paths are decoded byte-for-byte as Latin-1, as WSGI servers do.
fn decode_path(raw: &str) -> String {
    urlencoding::decode_binary(raw.as_bytes())
        .iter()
        .map(|&byte| char::from(byte))
        .collect()
}

fn parse_query(query: &str) -> Value {
    let mut values: IndexMap<String, Vec<String>> = IndexMap::new();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        values
            .entry(decode_component(key))
            .or_default()
            .push(decode_component(value));
    }

    let map: Map<String, Value> = values
        .into_iter()
        .map(|(key, mut items)| {
            let value = if items.len() == 1 {
                Value::String(items.remove(0))
            } else {
                Value::Array(items.into_iter().map(Value::String).collect())
            };
            (key, value)
        })
        .collect();
    Value::Object(map)
}

/// A response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Text(String),
    Html(String),
    Json(Value),
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: Body,
}

impl Response {
    pub fn new(status: Status, body: Body) -> Self {
        Self { status, body }
    }

    pub fn empty(status: Status) -> Self {
        Self::new(status, Body::Empty)
    }

    pub fn text(status: Status, text: impl Into<String>) -> Self {
        Self::new(status, Body::Text(text.into()))
    }

    pub fn html(status: Status, html: impl Into<String>) -> Self {
        Self::new(status, Body::Html(html.into()))
    }

    pub fn json(status: Status, value: Value) -> Self {
        Self::new(status, Body::Json(value))
    }

    /// `{"message": ..}`, the shape of every client-facing error.
    pub fn message(status: Status, message: impl Into<String>) -> Self {
        Self::json(status, serde_json::json!({ "message": message.into() }))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self.body {
            Body::Empty => None,
            Body::Text(_) => Some("text/plain; charset=utf-8"),
            Body::Html(_) => Some("text/html; charset=utf-8"),
            Body::Json(_) => Some("application/json"),
        }
    }

    /// The body as sent on the wire; empty for [`Body::Empty`].
    pub fn body_string(&self) -> String {
        match &self.body {
            Body::Empty => String::new(),
            Body::Text(text) | Body::Html(text) => text.clone(),
            Body::Json(value) => value.to_string(),
        }
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_line() {
        assert_eq!(Status::Ok.to_string(), "200 OK");
        assert_eq!(Status::BadRequest.to_string(), "400 Bad Request");
        assert_eq!(Status::NotFound.to_string(), "404 Not Found");
        assert_eq!(
            Status::InternalServerError.to_string(),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(
            "delete".parse::<Method>(),
            Err(UnsupportedMethod("DELETE".to_string()))
        );
        assert_eq!(
            "DELETE".parse::<Method>().unwrap_err().to_string(),
            "unsupported method 'DELETE'"
        );
    }

    #[test]
    fn test_target_split() {
        let request = Request::get("/a%20b?x=1");
        assert_eq!(request.path(), "/a b");
        assert_eq!(request.query(), "x=1");
    }

    #[test]
    fn test_headers_lowercased_and_joined() {
        let request = Request::get("/")
            .with_header("X-Thing", "a")
            .with_header("x-thing", " b ");
        assert_eq!(request.header("x-thing"), Some("a,b"));
        assert_eq!(request.header("X-THING"), Some("a,b"));
    }

    #[test]
    fn test_parameters_empty() {
        assert_eq!(Request::get("/query_test").parameters(), json!({}));
    }

    #[test]
    fn test_parameters_repeated() {
        let request = Request::get("/query_test?foo=bar&foo=baz");
        assert_eq!(request.parameters(), json!({"foo": ["bar", "baz"]}));
    }

    #[test]
    fn test_parameters_decoding() {
        let request = Request::get("/q?na%6De=a%26b&flag&c=%C3%BC");
        assert_eq!(request.parameters(), json!({"name": "a&b", "c": "ü"}));
    }

    #[test]
    fn test_json_body() {
        let request = Request::post("/").with_json(&json!({"a": 1}));
        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(request.json().unwrap(), json!({"a": 1}));
        assert!(Request::post("/").json().is_err());
    }

    #[test]
    fn test_form_data_without_content_type() {
        let err = Request::post("/").with_body("x").form_data().unwrap_err();
        assert!(matches!(err, FormatError::BoundaryNotFound { .. }));
    }

    #[test]
    fn test_response_bodies() {
        let json = Response::json(Status::Ok, json!({"message": "hi sailor"}));
        assert_eq!(json.content_type(), Some("application/json"));
        assert_eq!(json.body_string(), r#"{"message":"hi sailor"}"#);

        let text = Response::text(Status::Ok, "hi sailor");
        assert_eq!(text.body_string(), "hi sailor");
        assert_eq!(text.json_body(), None);

        let empty = Response::empty(Status::Ok);
        assert_eq!(empty.body_string(), "");
        assert_eq!(empty.content_type(), None);
    }
}
