//! SMTP provider using Lettre

use crate::email::{EmailProvider, OutgoingEmail, SendFuture};
use crate::error::NotificationError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::json;

/// Sends email over SMTP
///
/// Lettre's blocking transport runs on the blocking pool. The SMTP reply is
/// turned into `{"code": "250", "message": [...]}` so callers get a JSON body
/// just like the HTTP providers return.
///
/// ```ignore
/// let provider = SmtpEmailProvider::new(
///     "smtp.gmail.com".to_string(),
///     587,
///     "user@gmail.com".to_string(),
///     "app_password".to_string(),
/// );
/// ```
#[derive(Clone)]
pub struct SmtpEmailProvider {
    smtp_server: String,
    smtp_port: u16,
    credentials: Credentials,
}

impl SmtpEmailProvider {
    /// Create a new SMTP provider
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
    ) -> Self {
        Self {
            smtp_server,
            smtp_port,
            credentials: Credentials::new(smtp_username, smtp_password),
        }
    }

    /// A new transport per email, no pooling
    fn build_transport(&self) -> Result<SmtpTransport, NotificationError> {
        Ok(SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| NotificationError::Smtp(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<serde_json::Value, NotificationError> {
        let message = build_message(&email)?;
        let mailer = self.build_transport()?;

        let response = tokio::task::spawn_blocking(move || {
            mailer
                .send(&message)
                .map_err(|e| NotificationError::Smtp(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| NotificationError::Smtp(format!("Email task failed: {e}")))??;

        let lines: Vec<String> = response.message().map(ToString::to_string).collect();
        tracing::debug!(code = %response.code(), "SMTP server accepted email");

        Ok(json!({
            "code": response.code().to_string(),
            "message": lines,
        }))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotificationError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Build the MIME message for an [`OutgoingEmail`]
fn build_message(email: &OutgoingEmail) -> Result<Message, NotificationError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| NotificationError::Smtp(format!("Failed to build email: {e}")))
}

impl std::fmt::Debug for SmtpEmailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpEmailProvider")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .finish_non_exhaustive()
    }
}

impl EmailProvider for SmtpEmailProvider {
    fn send(&self, email: OutgoingEmail) -> SendFuture<'_> {
        Box::pin(self.deliver(email))
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
