//! Email provider implementations
//!
//! - [`ResendEmailProvider`]: production, Resend HTTP API
//! - [`SmtpEmailProvider`]: any SMTP relay
//! - [`ConsoleEmailProvider`]: logs only, for local development

pub mod console;
pub mod resend;
pub mod smtp;

pub use console::ConsoleEmailProvider;
pub use resend::{ResendEmailProvider, DEFAULT_RESEND_API_URL};
pub use smtp::SmtpEmailProvider;
