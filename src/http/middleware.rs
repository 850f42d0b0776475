//! Handler wrappers for request validation and state injection.
//!
//! Each wrapper takes a handler and returns a new one, so they compose by
//! plain nesting in the order they should run.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::router::HandlerResult;
use super::{Request, Response, Status};
use crate::path::ValuePath;
use crate::schema::SchemaLike;
use stillwater::Validation;

/// Message sent when the payload to validate could not be decoded at all.
pub const UNPARSABLE_BODY: &str = "The request body could not be parsed or is empty.";

/// Which part of the request a schema applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSource {
    /// The decoded query string.
    Parameters,
    JsonBody,
    FormData,
}

/// Rejects requests whose `source` does not satisfy `schema` with a 400
/// `{"message": ..}` response, and passes the rest on to `handler`.
///
/// A body that cannot be decoded is also a 400, except for multipart input
/// that fails on an internal invariant, which is raised as a handler error.
pub fn expect_schema<S, F>(
    schema: S,
    source: ValidationSource,
    handler: F,
) -> impl Fn(&Request) -> HandlerResult + Send + Sync + 'static
where
    S: SchemaLike + 'static,
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    move |request: &Request| {
        let subject = match extract(request, source)? {
            Some(subject) => subject,
            None => return Ok(Response::message(Status::BadRequest, UNPARSABLE_BODY)),
        };

        match schema.validate(&subject, &ValuePath::root()) {
            Validation::Success(()) => handler(request),
            Validation::Failure(failure) => {
                debug!(path = request.path(), %failure, "request validation failed");
                Ok(Response::message(Status::BadRequest, failure.message))
            }
        }
    }
}

fn extract(request: &Request, source: ValidationSource) -> Result<Option<Value>, super::HandlerError> {
    match source {
        ValidationSource::Parameters => Ok(Some(request.parameters())),
        ValidationSource::JsonBody => match request.json() {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                debug!(error = %err, "request body is not valid JSON");
                Ok(None)
            }
        },
        ValidationSource::FormData => match request.form_data() {
            Ok(form) => Ok(Some(form.to_value())),
            Err(err) if err.is_internal() => Err(err.into()),
            Err(err) => {
                debug!(error = %err, "request body is not valid form data");
                Ok(None)
            }
        },
    }
}

/// [`expect_schema`] against the query parameters.
pub fn expect_params<S, F>(schema: S, handler: F) -> impl Fn(&Request) -> HandlerResult + Send + Sync + 'static
where
    S: SchemaLike + 'static,
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    expect_schema(schema, ValidationSource::Parameters, handler)
}

/// [`expect_schema`] against the JSON body.
pub fn expect_json<S, F>(schema: S, handler: F) -> impl Fn(&Request) -> HandlerResult + Send + Sync + 'static
where
    S: SchemaLike + 'static,
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    expect_schema(schema, ValidationSource::JsonBody, handler)
}

/// [`expect_schema`] against the multipart form fields.
pub fn expect_form_data<S, F>(schema: S, handler: F) -> impl Fn(&Request) -> HandlerResult + Send + Sync + 'static
where
    S: SchemaLike + 'static,
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    expect_schema(schema, ValidationSource::FormData, handler)
}

/// Passes shared state to `handler` alongside each request.
///
/// ```rust
/// use std::sync::Arc;
/// use joshinkan::http::{with_context, Request, Response, Status};
///
/// struct Greeting(&'static str);
///
/// let handler = with_context(Arc::new(Greeting("hi sailor")), |_req: &Request, ctx: &Greeting| {
///     Ok(Response::text(Status::Ok, ctx.0))
/// });
/// let response = handler(&Request::get("/")).unwrap();
/// assert_eq!(response.body_string(), "hi sailor");
/// ```
pub fn with_context<C, F>(context: Arc<C>, handler: F) -> impl Fn(&Request) -> HandlerResult + Send + Sync + 'static
where
    C: Send + Sync + 'static,
    F: Fn(&Request, &C) -> HandlerResult + Send + Sync + 'static,
{
    move |request: &Request| handler(request, &context)
}
