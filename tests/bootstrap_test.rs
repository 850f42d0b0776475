use std::sync::Arc;

use joshinkan::config::ConfigError;
use joshinkan::http::{Method, Request, Status};
use joshinkan::mail::Outbox;
use joshinkan::routes::{app_from_lookup, StartupError};

fn env(level: &'static str) -> impl Fn(&str) -> Option<String> {
    move |name: &str| match name {
        "LOGLEVEL" => Some(level.to_string()),
        "SMTP_USER" => Some("Dojo <dojo@example.com>".to_string()),
        "SMTP_PASSWORD" => Some("secret".to_string()),
        _ => None,
    }
}

// One test per binary: the global subscriber can only be installed once.
#[test]
fn test_startup_installs_logging_once() {
    let outbox = Arc::new(Outbox::new());

    let err = app_from_lookup(env("LOUD"), outbox.clone()).unwrap_err();
    assert!(matches!(
        err,
        StartupError::Config(ConfigError::InvalidValue { ref name, .. }) if name == "LOGLEVEL"
    ));

    let app = app_from_lookup(env("warning"), outbox.clone()).unwrap();
    assert_eq!(app.config().log_level, "warning");
    assert_eq!(app.routes().len(), 1);
    assert!(app.routes().has_route(Method::Post, "/trial-registration"));
    assert_eq!(
        app.handle(&Request::post("/trial-registration")).status,
        Status::BadRequest
    );
    assert!(outbox.is_empty());

    let err = app_from_lookup(env("INFO"), outbox).unwrap_err();
    assert!(matches!(err, StartupError::Config(ConfigError::Logging(_))));
}
