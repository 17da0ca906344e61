//! Console provider for local development

use crate::email::{EmailProvider, OutgoingEmail, SendFuture};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Logs emails instead of sending them
///
/// Returns `{"id": "console-<uuid>"}` so the response shape matches Resend's.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console provider
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    fn send(&self, email: OutgoingEmail) -> SendFuture<'_> {
        Box::pin(async move {
            let id = format!("console-{}", Uuid::new_v4());

            info!(
                id = %id,
                from = %email.from,
                to = ?email.to,
                subject = %email.subject,
                html_bytes = email.html.len(),
                "📧 Email (Development Mode)"
            );

            Ok(json!({ "id": id }))
        })
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_returns_synthetic_id() {
        let provider = ConsoleEmailProvider::new();
        let body = provider
            .send(OutgoingEmail {
                from: "Sathi <onboarding@resend.dev>".to_string(),
                to: vec!["asha@example.com".to_string()],
                subject: "hello".to_string(),
                html: "<p>hello</p>".to_string(),
            })
            .await
            .unwrap();

        assert!(body["id"].as_str().unwrap().starts_with("console-"));
    }
}
