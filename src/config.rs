//! Environment-driven application configuration.

use std::env;
use std::fmt;

use thiserror::Error;

use crate::mail::{AddressError, EmailUser};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("invalid email address in {name}: {source}")]
    InvalidEmail {
        name: String,
        #[source]
        source: AddressError,
    },

    #[error("could not install log subscriber: {0}")]
    Logging(String),
}

/// Settings the request dispatcher needs, independent of where they come from.
pub trait AppConfig: Send + Sync {
    /// Whether a failing handler's error chain is included in the 500 page.
    fn print_stacktrace(&self) -> bool;

    fn log_level(&self) -> &str;
}

/// Application settings.
///
/// `Debug` output never contains the SMTP password.
#[derive(Clone)]
pub struct Config {
    pub log_level: String,
    pub print_stacktrace: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: EmailUser,
    pub smtp_password: String,
    pub smtp_reply_to: Option<EmailUser>,
    pub smtp_cc: Vec<EmailUser>,
    pub smtp_bcc: Vec<EmailUser>,
}

impl Config {
    /// Config with defaults for everything but the sender account.
    pub fn new(smtp_user: EmailUser, smtp_password: impl Into<String>) -> Self {
        Self {
            log_level: "DEBUG".to_string(),
            print_stacktrace: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user,
            smtp_password: smtp_password.into(),
            smtp_reply_to: None,
            smtp_cc: Vec::new(),
            smtp_bcc: Vec::new(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// ```rust
    /// use joshinkan::config::Config;
    ///
    /// let config = Config::from_lookup(|name| match name {
    ///     "SMTP_USER" => Some("Dojo <dojo@example.com>".to_string()),
    ///     "SMTP_PASSWORD" => Some("secret".to_string()),
    ///     "SMTP_CC" => Some("a@example.com, b@example.com".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.smtp_port, 587);
    /// assert_eq!(config.smtp_cc.len(), 2);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|value| value.trim().to_string());
        let required = |name: &str| {
            read(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
        };

        let log_level = read("LOGLEVEL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "DEBUG".to_string());
        let print_stacktrace = read("PRINT_STACKTRACE").is_some_and(|value| !value.is_empty());
        let smtp_host = read("SMTP_HOST")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "smtp.gmail.com".to_string());

        let smtp_port = match read("SMTP_PORT").filter(|value| !value.is_empty()) {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "SMTP_PORT".to_string(),
                reason: format!("'{}' is not a port number ({})", value, e),
            })?,
            None => 587,
        };

        let smtp_user = parse_user("SMTP_USER", &required("SMTP_USER")?)?;
        let smtp_password = required("SMTP_PASSWORD")?;
        let smtp_reply_to = read("SMTP_REPLY_TO")
            .map(|value| parse_user("SMTP_REPLY_TO", &value))
            .transpose()?;
        let smtp_cc = parse_user_list("SMTP_CC", read("SMTP_CC").as_deref())?;
        let smtp_bcc = parse_user_list("SMTP_BCC", read("SMTP_BCC").as_deref())?;

        Ok(Config {
            log_level,
            print_stacktrace,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_password,
            smtp_reply_to,
            smtp_cc,
            smtp_bcc,
        })
    }

    /// Address replies should go to; the sender unless `SMTP_REPLY_TO` is set.
    pub fn reply_to(&self) -> &EmailUser {
        self.smtp_reply_to.as_ref().unwrap_or(&self.smtp_user)
    }
}

fn parse_user(name: &str, value: &str) -> Result<EmailUser, ConfigError> {
    EmailUser::from_description(value).map_err(|source| ConfigError::InvalidEmail {
        name: name.to_string(),
        source,
    })
}

fn parse_user_list(name: &str, value: Option<&str>) -> Result<Vec<EmailUser>, ConfigError> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_user(name, entry))
        .collect()
}

impl AppConfig for Config {
    fn print_stacktrace(&self) -> bool {
        self.print_stacktrace
    }

    fn log_level(&self) -> &str {
        &self.log_level
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("print_stacktrace", &self.print_stacktrace)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user.to_string())
            .field("smtp_password", &"<redacted>")
            .field("smtp_reply_to", &self.smtp_reply_to.as_ref().map(ToString::to_string))
            .field("smtp_cc", &self.smtp_cc.iter().map(ToString::to_string).collect::<Vec<_>>())
            .field("smtp_bcc", &self.smtp_bcc.iter().map(ToString::to_string).collect::<Vec<_>>())
            .finish()
    }
}
