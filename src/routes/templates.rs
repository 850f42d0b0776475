//! Mail content for trial registrations.

use crate::config::Config;
use crate::mail::{EmailMessage, EmailUser};

/// Subject of every acknowledgement sent to a registrant.
pub const ACKNOWLEDGEMENT_SUBJECT: &str = "Joshinkan Werder Karate - Anmeldung zum Probetraining";

/// A message together with its envelope recipients.
pub(crate) type Outgoing = (EmailMessage, Vec<EmailUser>);

/// Contact details of whoever filled in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
}

impl Registrant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn mailbox(&self) -> EmailUser {
        EmailUser::new(Some(self.full_name()), self.email.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
}

/// `a`, `a und b`, `a, b und c`.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [rest @ .., last] => format!(
            "{} und {}",
            rest.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(", "),
            last.as_ref()
        ),
    }
}

/// Club notification: from the sender to the reply-to address, copied to
/// `SMTP_CC`, delivered to sender, cc and bcc.
fn notification(config: &Config, subject: String, html: String) -> Outgoing {
    let message = EmailMessage::new(config.smtp_user.clone(), subject)
        .to(config.reply_to().clone())
        .cc(config.smtp_cc.iter().cloned())
        .html(html);
    let recipients = std::iter::once(config.smtp_user.clone())
        .chain(config.smtp_cc.iter().cloned())
        .chain(config.smtp_bcc.iter().cloned())
        .collect();
    (message, recipients)
}

fn acknowledgement(config: &Config, registrant: &Registrant, html: String) -> Outgoing {
    let mailbox = registrant.mailbox();
    let message = EmailMessage::new(config.smtp_user.clone(), ACKNOWLEDGEMENT_SUBJECT)
        .to(mailbox.clone())
        .cc(config.smtp_cc.iter().cloned())
        .reply_to(config.reply_to().clone())
        .html(html);
    let recipients = std::iter::once(mailbox)
        .chain(config.smtp_cc.iter().cloned())
        .chain(config.smtp_bcc.iter().cloned())
        .collect();
    (message, recipients)
}

pub(crate) fn adult_registration(config: &Config, registrant: &Registrant, domain: &str) -> Vec<Outgoing> {
    let details = format!(
        "Neuanmeldung zum Probetraining für <b>Erwachsene</b>.<br/>\n\
         <br/>\n\
         Name: {}<br/>\n\
         Alter: {}<br/>\n\
         Email: {}<br/>\n\
         Telefon: {}<br/>\n",
        registrant.full_name(),
        registrant.age,
        registrant.email,
        registrant.phone,
    );

    let thanks = format!(
        "Hallo {},<br/>\n\
         <br/>\n\
         Vielen Dank für die Anmeldung zum Probetraining.<br/>\n\
         <br/>\n\
         Einer unserer Trainer wird sich in Kürze bei dir melden und die Anmeldung mit \
         einem Termin zum ersten Training bestätigen. Falls du in der Zwischenzeit \
         weitere Fragen hast, findest du Infos <a href=\"{}/kontakt\">hier</a>.<br/>\n\
         <br/>\n\
         Liebe Grüße,<br/>\n\
         Das Joshinkan Team<br/>\n",
        registrant.first_name, domain,
    );

    vec![
        notification(config, "Anmeldung zum Probetraining: Erwachsene".to_string(), details),
        acknowledgement(config, registrant, thanks),
    ]
}

fn child_block(index: usize, child: &Child) -> String {
    format!(
        "<b>Kind #{}</b><br/>\n\
         Name: {} {}<br/>\n\
         Alter: {}<br/>\n",
        index + 1,
        child.first_name,
        child.last_name,
        child.age,
    )
}

pub(crate) fn children_registration(
    config: &Config,
    registrant: &Registrant,
    children: &[Child],
    domain: &str,
) -> Vec<Outgoing> {
    let blocks = children
        .iter()
        .enumerate()
        .map(|(index, child)| child_block(index, child))
        .collect::<Vec<_>>()
        .join("<br/>\n");

    let details = format!(
        "Neuanmeldung zum Probetraining für <b>Kinder</b>.<br/>\n\
         <br/>\n\
         {}\
         <br/>\n\
         <b>Elternteil</b><br/>\n\
         Name: {}<br/>\n\
         Email: {}<br/>\n\
         Telefon: {}<br/>\n",
        blocks,
        registrant.full_name(),
        registrant.email,
        registrant.phone,
    );

    let names: Vec<&str> = children.iter().map(|child| child.first_name.as_str()).collect();
    let thanks = format!(
        "Liebe Familie {},<br/>\n\
         <br/>\n\
         Vielen Dank für die Anmeldung von {} zum Probetraining.<br/>\n\
         <br/>\n\
         Einer unserer Trainer wird sich in Kürze bei euch melden und die Anmeldung mit \
         einem Termin zum ersten Training bestätigen. Falls ihr in der Zwischenzeit \
         weitere Fragen habt, findet ihr Infos <a href=\"{}/kontakt\">hier</a>.<br/>\n\
         <br/>\n\
         Liebe Grüße,<br/>\n\
         Das Joshinkan Team<br/>\n",
        registrant.last_name,
        join_names(&names),
        domain,
    );

    vec![
        notification(
            config,
            format!("Anmeldung zum Probetraining: Kinder ({})", children.len()),
            details,
        ),
        acknowledgement(config, registrant, thanks),
    ]
}
