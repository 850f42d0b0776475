//! Mail addresses, messages and the delivery seam.
//!
//! Delivery itself sits behind the [`Mailer`] trait; this crate ships only
//! [`Outbox`], which records messages instead of sending them.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::OnceLock;

use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
    })
}

fn user_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>[^<>]+)?(?:\s*<(?P<email>.+)>\s*)?$").expect("user pattern is valid")
    })
}

/// An address description could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("unexpected address format '{0}', expected 'Name <user@host>' or 'user@host'")]
    UnexpectedFormat(String),
}

/// A mailbox, optionally with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailUser {
    pub name: Option<String>,
    pub email: String,
}

impl EmailUser {
    /// Builds a mailbox without validating the address.
    pub fn new(name: Option<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.filter(|name| !name.trim().is_empty()),
            email: email.into(),
        }
    }

    pub fn is_valid_email(email: &str) -> bool {
        email_pattern().is_match(email)
    }

    /// Parses `Name <user@host>`, `<user@host>` or a bare `user@host`.
    ///
    /// ```rust
    /// use joshinkan::mail::EmailUser;
    ///
    /// let user = EmailUser::from_description("Joshinkan <info@joshinkan.de>").unwrap();
    /// assert_eq!(user.name.as_deref(), Some("Joshinkan"));
    /// assert_eq!(user.to_string(), "Joshinkan <info@joshinkan.de>");
    ///
    /// let bare = EmailUser::from_description("info@joshinkan.de").unwrap();
    /// assert_eq!(bare.to_string(), "<info@joshinkan.de>");
    /// ```
    pub fn from_description(description: &str) -> Result<Self, AddressError> {
        let captures = user_pattern()
            .captures(description)
            .ok_or_else(|| AddressError::UnexpectedFormat(description.to_string()))?;

        let name = captures.name("name").map(|m| m.as_str().trim());
        let email = captures.name("email").map(|m| m.as_str());

        let (name, email) = match (name, email) {
            (Some(bare), None) => (None, bare),
            (name, Some(email)) if !email.is_empty() => (name, email),
            _ => return Err(AddressError::UnexpectedFormat(description.to_string())),
        };

        if !Self::is_valid_email(email) {
            return Err(AddressError::InvalidEmail(email.to_string()));
        }
        Ok(Self::new(name.map(str::to_string), email))
    }
}

impl FromStr for EmailUser {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_description(s)
    }
}

impl Display for EmailUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "<{}>", self.email),
        }
    }
}

/// An HTML mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: EmailUser,
    pub to: Vec<EmailUser>,
    pub cc: Vec<EmailUser>,
    pub reply_to: Option<EmailUser>,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    pub fn new(from: EmailUser, subject: impl Into<String>) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            reply_to: None,
            subject: subject.into(),
            html: String::new(),
        }
    }

    pub fn to(mut self, user: EmailUser) -> Self {
        self.to.push(user);
        self
    }

    pub fn cc(mut self, users: impl IntoIterator<Item = EmailUser>) -> Self {
        self.cc.extend(users);
        self
    }

    pub fn reply_to(mut self, user: EmailUser) -> Self {
        self.reply_to = Some(user);
        self
    }

    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = body.into();
        self
    }
}

/// Delivery of a message failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Hands messages to a transport.
///
/// `recipients` is the envelope: every mailbox that receives a copy,
/// including blind copies that do not appear in the headers.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage, recipients: &[EmailUser]) -> Result<(), MailError>;
}

/// A message accepted by an [`Outbox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub message: EmailMessage,
    pub recipients: Vec<EmailUser>,
}

/// A [`Mailer`] that keeps every message in memory.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<SentMail>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl Mailer for Outbox {
    fn send(&self, message: &EmailMessage, recipients: &[EmailUser]) -> Result<(), MailError> {
        tracing::debug!(
            subject = %message.subject,
            recipients = recipients.len(),
            "recording outgoing mail"
        );
        self.sent.lock().push(SentMail {
            message: message.clone(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_user() {
        let user = EmailUser::from_description("Sensei Name <sensei@example.com>").unwrap();
        assert_eq!(user.name.as_deref(), Some("Sensei Name"));
        assert_eq!(user.email, "sensei@example.com");
    }

    #[test]
    fn test_bare_address() {
        let user: EmailUser = "sender@example.com".parse().unwrap();
        assert_eq!(user.name, None);
        assert_eq!(user.to_string(), "<sender@example.com>");
    }

    #[test]
    fn test_bracketed_address() {
        let user = EmailUser::from_description("<sender@example.com>").unwrap();
        assert_eq!(user.name, None);
        assert_eq!(user.email, "sender@example.com");
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(
            EmailUser::from_description("Name <not-an-email>"),
            Err(AddressError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            EmailUser::from_description("not-an-email"),
            Err(AddressError::InvalidEmail("not-an-email".to_string()))
        );
    }

    #[test]
    fn test_unexpected_format() {
        assert!(matches!(
            EmailUser::from_description(""),
            Err(AddressError::UnexpectedFormat(_))
        ));
        assert!(matches!(
            EmailUser::from_description("a <b@c.de> <d@e.fg>"),
            Err(AddressError::InvalidEmail(_)) | Err(AddressError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn test_blank_name_dropped() {
        let user = EmailUser::new(Some("  ".to_string()), "a@b.de");
        assert_eq!(user.to_string(), "<a@b.de>");
    }

    #[test]
    fn test_message_builder() {
        let from = EmailUser::new(None, "from@example.com");
        let message = EmailMessage::new(from.clone(), "Hi")
            .to(EmailUser::new(Some("To".to_string()), "to@example.com"))
            .cc(vec![EmailUser::new(None, "cc@example.com")])
            .reply_to(from.clone())
            .html("<b>hi</b>");

        assert_eq!(message.subject, "Hi");
        assert_eq!(message.to.len(), 1);
        assert_eq!(message.cc.len(), 1);
        assert_eq!(message.reply_to, Some(from));
        assert_eq!(message.html, "<b>hi</b>");
    }

    #[test]
    fn test_outbox_records() {
        let outbox = Outbox::new();
        assert!(outbox.is_empty());

        let from = EmailUser::new(None, "from@example.com");
        let message = EmailMessage::new(from.clone(), "Hi");
        outbox.send(&message, &[from.clone()]).unwrap();

        assert_eq!(outbox.len(), 1);
        let sent = outbox.sent();
        assert_eq!(sent[0].message.subject, "Hi");
        assert_eq!(sent[0].recipients, vec![from]);
    }
}
