//! Route registration and request dispatch.

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, error};

use super::{Method, Request, Response, Status};
use crate::config::AppConfig;
use crate::error::FormatError;
use crate::mail::MailError;

/// Errors raised while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid route path '{0}': must be non-empty and start with '/'")]
    InvalidPath(String),

    #[error("the route {method} {path} already exists")]
    DuplicateRoute { method: Method, path: String },
}

/// A failure inside a handler; answered with a 500 page.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Form(#[from] FormatError),

    #[error("{0}")]
    Message(String),
}

pub type HandlerResult = Result<Response, HandlerError>;

/// A registered request handler.
pub type Handler = Arc<dyn Fn(&Request) -> HandlerResult + Send + Sync>;

/// Handlers keyed by path, then by method.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, IndexMap<Method, Handler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` requests to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPath`] unless `path` starts with `/`, and
    /// [`RouterError::DuplicateRoute`] if the pair is already taken.
    pub fn add<F>(&mut self, method: Method, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        if !path.starts_with('/') {
            return Err(RouterError::InvalidPath(path.to_string()));
        }
        if self.has_route(method, path) {
            return Err(RouterError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }

        debug!(%method, path, "registering route");
        self.routes
            .entry(path.to_string())
            .or_default()
            .insert(method, Arc::new(handler));
        Ok(())
    }

    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(Method::Get, path, handler)
    }

    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.add(Method::Post, path, handler)
    }

    pub fn has_route(&self, method: Method, path: &str) -> bool {
        self.route(method, path).is_some()
    }

    pub fn route(&self, method: Method, path: &str) -> Option<&Handler> {
        self.routes.get(path).and_then(|methods| methods.get(&method))
    }

    /// Number of registered (method, path) pairs.
    pub fn len(&self) -> usize {
        self.routes.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.routes
                    .iter()
                    .map(|(path, methods)| (path, methods.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

/// A routed application.
#[derive(Debug)]
pub struct App<C: AppConfig> {
    routes: RouteTable,
    config: Arc<C>,
}

impl<C: AppConfig> App<C> {
    pub fn new(routes: RouteTable, config: Arc<C>) -> Self {
        Self { routes, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Dispatches `request` to its handler.
    ///
    /// Unknown routes get a 404 page. A handler error is logged and turned
    /// into a 500 page, which includes the error chain only when the config
    /// asks for stack traces.
    pub fn handle(&self, request: &Request) -> Response {
        let method = request.method();
        let path = request.path();
        debug!(%method, path, query = request.query(), "handling request");

        let Some(handler) = self.routes.route(method, path) else {
            debug!(%method, path, "no route");
            return Response::html(
                Status::NotFound,
                format!(
                    "<h1>Not Found</h1>The {} route at {} does not exist.",
                    method, path
                ),
            );
        };

        match handler(request) {
            Ok(response) => response,
            Err(err) => {
                let trace = error_chain(&err);
                error!(%method, path, error = %trace, "request handler failed");

                let detail = if self.config.print_stacktrace() {
                    trace
                } else {
                    String::new()
                };
                Response::html(
                    Status::InternalServerError,
                    format!("<h1>Internal Server Error</h1><pre>{}</pre>", detail),
                )
            }
        }
    }
}

/// `Debug` of the error followed by each `source()`.
fn error_chain(err: &HandlerError) -> String {
    let mut trace = format!("{:?}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(trace, "\ncaused by: {}", cause);
        source = cause.source();
    }
    trace
}
