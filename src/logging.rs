//! Log subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;

/// Maps a `LOGLEVEL` name (`DEBUG`, `INFO`, `WARNING`, `ERROR`, any case) to a
/// filter directive.
pub fn directive(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => Ok("debug"),
        "INFO" => Ok("info"),
        "WARNING" | "WARN" => Ok("warn"),
        "ERROR" | "CRITICAL" => Ok("error"),
        _ => Err(ConfigError::InvalidValue {
            name: "LOGLEVEL".to_string(),
            reason: format!(
                "unknown log level '{}', choose from DEBUG, INFO, WARNING or ERROR",
                level
            ),
        }),
    }
}

/// Installs a global fmt subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence when set, so individual modules can be
/// tuned without touching the application config.
pub fn init(level: &str) -> Result<(), ConfigError> {
    let directive = directive(level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
