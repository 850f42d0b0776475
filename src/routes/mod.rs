//! Club endpoints.

mod templates;

use std::env;
use std::sync::{Arc, LazyLock};

use stillwater::Validation;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::http::{
    with_context, App, HandlerResult, Request, Response, RouteTable, RouterError, Status,
    UNPARSABLE_BODY,
};
use crate::logging;
use crate::mail::Mailer;
use crate::multipart::FormData;
use crate::path::ValuePath;
use crate::schema::{ObjectSchema, Schema, SchemaLike};

pub use templates::{join_names, Child, Registrant, ACKNOWLEDGEMENT_SUBJECT};

/// Form fields only the children's registration sends.
const CHILD_FIELDS: [&str; 3] = ["child_first_name", "child_last_name", "child_age"];

fn contact_fields() -> ObjectSchema {
    Schema::object()
        .field("first_name", Schema::string())
        .field("last_name", Schema::string())
        .field("email", Schema::string())
        .field("phone", Schema::string())
        .field("privacy", Schema::values(["on"]))
        .field("age", Schema::string())
}

/// Trial registration of an adult.
pub static ADULT_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(contact_fields);

/// Trial registration of one or more children by a parent.
pub static CHILDREN_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(|| {
    contact_fields()
        .field("child_first_name", Schema::list_of(Schema::string()))
        .field("child_last_name", Schema::list_of(Schema::string()))
        .field("child_age", Schema::list_of(Schema::string()))
        .field("parents_consent", Schema::values(["on"]))
});

/// Services shared by every request.
pub struct AppContext {
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(mailer: Arc<dyn Mailer>, config: Arc<Config>) -> Self {
        Self { mailer, config }
    }
}

/// Registers every club route.
pub fn build_routes(context: Arc<AppContext>) -> Result<RouteTable, RouterError> {
    let mut routes = RouteTable::new();
    routes.post("/trial-registration", with_context(context, trial_registration))?;
    Ok(routes)
}

/// The routed application for `config`, sending mail through `mailer`.
pub fn build_app(config: Arc<Config>, mailer: Arc<dyn Mailer>) -> Result<App<Config>, RouterError> {
    let context = Arc::new(AppContext::new(mailer, Arc::clone(&config)));
    let routes = build_routes(context)?;
    info!(routes = routes.len(), "application built");
    Ok(App::new(routes, config))
}

/// Errors raised while starting the application.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Loads the config from the environment, installs logging at its
/// `LOGLEVEL` and builds the application.
pub fn app_from_env(mailer: Arc<dyn Mailer>) -> Result<App<Config>, StartupError> {
    app_from_lookup(|name| env::var(name).ok(), mailer)
}

/// [`app_from_env`] with variables read through `lookup`.
///
/// Installs the global log subscriber, so it succeeds at most once per process.
pub fn app_from_lookup<F>(lookup: F, mailer: Arc<dyn Mailer>) -> Result<App<Config>, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    logging::init(&config.log_level)?;
    info!(?config, "configuration loaded");
    Ok(build_app(Arc::new(config), mailer)?)
}

/// `POST /trial-registration`
///
/// Accepts the trial-training form as multipart form data. A valid children's
/// registration takes precedence over an adult one. Each success sends a
/// notification to the club and an acknowledgement to the registrant.
pub fn trial_registration(request: &Request, context: &AppContext) -> HandlerResult {
    let form = match request.form_data() {
        Ok(form) => form,
        Err(err) if err.is_internal() => return Err(err.into()),
        Err(err) => {
            warn!(error = %err, "could not parse registration form");
            return Ok(Response::message(Status::BadRequest, UNPARSABLE_BODY));
        }
    };

    let subject = form.to_value();
    let children = CHILDREN_SCHEMA.validate(&subject, &ValuePath::root());
    let adult = ADULT_SCHEMA.validate(&subject, &ValuePath::root());

    let domain = request.header("origin").unwrap_or_default();
    let registrant = registrant(&form);

    let messages = match (children, adult) {
        (Validation::Success(()), _) => {
            let children = children_of(&form);
            debug!(children = children.len(), "children registration");
            templates::children_registration(&context.config, &registrant, &children, domain)
        }
        (_, Validation::Success(())) => {
            debug!("adult registration");
            templates::adult_registration(&context.config, &registrant, domain)
        }
        (Validation::Failure(child_failure), Validation::Failure(adult_failure)) => {
            let failure = if CHILD_FIELDS.iter().any(|name| form.contains(name)) {
                child_failure
            } else {
                adult_failure
            };
            debug!(%failure, "registration rejected");
            return Ok(Response::message(Status::BadRequest, failure.message));
        }
    };

    for (message, recipients) in &messages {
        context.mailer.send(message, recipients)?;
    }
    info!(registrant = %registrant.full_name(), "trial registration sent");
    Ok(Response::message(Status::Ok, "Email sent."))
}

fn text<'a>(form: &'a FormData, name: &str) -> &'a str {
    form.text(name).unwrap_or_default()
}

fn registrant(form: &FormData) -> Registrant {
    Registrant {
        first_name: text(form, "first_name").to_string(),
        last_name: text(form, "last_name").to_string(),
        email: text(form, "email").to_string(),
        phone: text(form, "phone").to_string(),
        age: text(form, "age").to_string(),
    }
}

/// Children in submission order. The lists are matched by position; a
/// shorter list leaves the remaining entries blank.
fn children_of(form: &FormData) -> Vec<Child> {
    let column = |name: &str| form.list(name).unwrap_or_default();
    let (first_names, last_names, ages) = (
        column("child_first_name"),
        column("child_last_name"),
        column("child_age"),
    );
    let cell = |values: &[String], index: usize| values.get(index).cloned().unwrap_or_default();

    (0..first_names.len())
        .map(|index| Child {
            first_name: cell(first_names, index),
            last_name: cell(last_names, index),
            age: cell(ages, index),
        })
        .collect()
}
