//! Email delivery over SMTP.
//!
//! A thin abstraction over [lettre](https://lettre.rs): the [`Mailer`] trait
//! is the seam the notification path depends on, and [`SmtpMailer`] is the
//! production implementation built from [`crate::Config`] at startup. The
//! notification path never constructs a transport per request.

mod mailer;
mod message;

pub use mailer::{Mailer, SmtpMailer};
pub use message::{Email, EmailBody, EmailBuilder};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
