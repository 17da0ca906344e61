//! Notification service: validate, render, send
//!
//! [`NotificationService`] is what both HTTP handlers and the in-process booking
//! controller call. It is stateless apart from its configuration; each call
//! renders one email and hands it to the configured [`EmailProvider`].

use crate::email::{EmailProvider, OutgoingEmail};
use crate::error::{NotificationError, Result};
use crate::requests::{BookingConfirmationRequest, BookingNotificationRequest};
use crate::templates::{self, RenderedEmail};
use chrono::Datelike;
use sathi_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sender used when none is configured
pub const DEFAULT_SENDER: &str = "Sathi <onboarding@resend.dev>";

/// Admin inbox used when none is configured
pub const DEFAULT_ADMIN_RECIPIENT: &str = "hyenabusiness01@gmail.com";

/// Success body of both notification endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Always `true`; failures are reported as errors instead
    pub success: bool,
    /// Provider response, relayed verbatim
    #[serde(rename = "emailResponse")]
    pub email_response: serde_json::Value,
}

#[derive(Clone, Copy)]
enum Kind {
    Confirmation,
    AdminNotification,
}

impl Kind {
    const fn label(self) -> &'static str {
        match self {
            Self::Confirmation => "booking_confirmation",
            Self::AdminNotification => "booking_notification",
        }
    }
}

/// Renders booking emails and sends them through a provider
#[derive(Clone)]
pub struct NotificationService {
    provider: Arc<dyn EmailProvider>,
    clock: Arc<dyn Clock>,
    sender: String,
    admin_recipient: String,
}

impl NotificationService {
    /// Create a service with the default sender and admin inbox
    #[must_use]
    pub fn new(provider: Arc<dyn EmailProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            sender: DEFAULT_SENDER.to_string(),
            admin_recipient: DEFAULT_ADMIN_RECIPIENT.to_string(),
        }
    }

    /// Override the `From` header
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Override the admin inbox for new-booking notifications
    #[must_use]
    pub fn with_admin_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.admin_recipient = recipient.into();
        self
    }

    /// Name of the configured provider
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Sender address in use
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Admin inbox in use
    #[must_use]
    pub fn admin_recipient(&self) -> &str {
        &self.admin_recipient
    }

    /// Tell a customer their booking was confirmed or cancelled
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidRequest`] for a blank recipient or
    /// booking id, or the provider's error if delivery fails.
    pub async fn send_booking_confirmation(
        &self,
        request: &BookingConfirmationRequest,
    ) -> Result<DispatchReceipt> {
        request.validate()?;

        tracing::info!(
            recipient = %request.user_email,
            status = %request.status,
            booking_id = %request.booking_id,
            "Sending booking confirmation email"
        );

        let rendered = templates::render_confirmation(request, self.clock.now().year());
        self.deliver(Kind::Confirmation, vec![request.user_email.clone()], rendered)
            .await
    }

    /// Tell the admin inbox about a new booking request
    ///
    /// # Errors
    ///
    /// Returns the provider's error if delivery fails.
    pub async fn send_booking_notification(
        &self,
        request: &BookingNotificationRequest,
    ) -> Result<DispatchReceipt> {
        tracing::info!(
            booking_id = %request.booking_id,
            user = %request.user_name,
            companion = %request.companion_name,
            "Sending booking notification email to admin"
        );

        let rendered = templates::render_admin_notification(request, self.clock.now().year());
        self.deliver(
            Kind::AdminNotification,
            vec![self.admin_recipient.clone()],
            rendered,
        )
        .await
    }

    async fn deliver(
        &self,
        kind: Kind,
        to: Vec<String>,
        rendered: RenderedEmail,
    ) -> Result<DispatchReceipt> {
        let email = OutgoingEmail {
            from: self.sender.clone(),
            to,
            subject: rendered.subject,
            html: rendered.html,
        };

        match self.provider.send(email).await {
            Ok(email_response) => {
                metrics::counter!("notifications.sent", "kind" => kind.label()).increment(1);
                tracing::info!(
                    kind = kind.label(),
                    provider = self.provider.name(),
                    response = %email_response,
                    "Email handed to provider"
                );
                Ok(DispatchReceipt {
                    success: true,
                    email_response,
                })
            },
            Err(error) => {
                metrics::counter!(
                    "notifications.failed",
                    "kind" => kind.label(),
                    "reason" => error.kind()
                )
                .increment(1);
                tracing::error!(
                    kind = kind.label(),
                    provider = self.provider.name(),
                    error = %error,
                    "Email delivery failed"
                );
                Err(error)
            },
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("provider", &self.provider.name())
            .field("sender", &self.sender)
            .field("admin_recipient", &self.admin_recipient)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockEmailProvider;
    use crate::requests::NotificationStatus;
    use sathi_testing::test_clock;

    fn service(provider: &MockEmailProvider) -> NotificationService {
        NotificationService::new(Arc::new(provider.clone()), Arc::new(test_clock()))
    }

    fn confirmation() -> BookingConfirmationRequest {
        BookingConfirmationRequest {
            user_email: "asha@example.com".to_string(),
            user_name: None,
            companion_name: "Meera".to_string(),
            booking_date: "2025-03-14".to_string(),
            start_time: "18:30".to_string(),
            duration_hours: 2.0,
            venue_name: "Blue Tokai".to_string(),
            venue_address: "Bandra West, Mumbai".to_string(),
            presence_nature: "silent_observant".to_string(),
            total_amount: 3000.0,
            status: NotificationStatus::Confirmed,
            booking_id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
        }
    }

    #[tokio::test]
    async fn test_confirmation_goes_to_customer() {
        let provider = MockEmailProvider::new();
        let receipt = service(&provider)
            .send_booking_confirmation(&confirmation())
            .await
            .unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.email_response["id"], "mock-1");

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["asha@example.com".to_string()]);
        assert_eq!(sent[0].from, DEFAULT_SENDER);
        assert!(sent[0].html.contains("© 2025 Sathi"));
    }

    #[tokio::test]
    async fn test_notification_goes_to_admin() {
        let provider = MockEmailProvider::new();
        let request = BookingNotificationRequest {
            user_name: "asha@example.com".to_string(),
            companion_name: "Meera".to_string(),
            booking_date: "2025-03-14".to_string(),
            start_time: "18:30".to_string(),
            venue_name: "Blue Tokai".to_string(),
            venue_address: "Bandra West".to_string(),
            presence_nature: "calm_listener".to_string(),
            total_amount: 1500.0,
            special_notes: None,
            booking_id: "b1".to_string(),
        };

        service(&provider)
            .with_admin_recipient("ops@sathi.test")
            .send_booking_notification(&request)
            .await
            .unwrap();

        let sent = provider.sent();
        assert_eq!(sent[0].to, vec!["ops@sathi.test".to_string()]);
        assert_eq!(sent[0].subject, "🔔 New Booking Request - Meera");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_provider() {
        let provider = MockEmailProvider::new();
        let mut request = confirmation();
        request.user_email = String::new();

        let err = service(&provider)
            .send_booking_confirmation(&request)
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::InvalidRequest(_)));
        assert_eq!(provider.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = MockEmailProvider::failing();
        let err = service(&provider)
            .send_booking_confirmation(&confirmation())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "rejected");
    }
}
