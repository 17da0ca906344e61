//! Seam between the status controller and the confirmation email
//!
//! The controller only knows [`ConfirmationDispatcher`]. The admin console goes
//! through the deployed notification endpoint
//! ([`HttpConfirmationDispatcher`]); the server calls its own
//! [`NotificationService`] directly ([`LocalConfirmationDispatcher`]).

use crate::error::DispatchError;
use crate::types::AdminBooking;
use reqwest::Client;
use sathi_notifications::{
    BookingConfirmationRequest, DispatchReceipt, NotificationService, NotificationStatus,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`ConfirmationDispatcher::dispatch`]
pub type DispatchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<DispatchReceipt, DispatchError>> + Send + 'a>>;

/// Sends one booking confirmation email
pub trait ConfirmationDispatcher: Send + Sync {
    /// Deliver the request
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the dispatcher cannot be reached or
    /// reports a failure.
    fn dispatch(&self, request: BookingConfirmationRequest) -> DispatchFuture<'_>;
}

/// Companion name used when the join found no companion row
pub const UNKNOWN_COMPANION: &str = "Unknown";

/// Snapshot an admin booking into a confirmation request
///
/// A booking without a joined companion is announced as [`UNKNOWN_COMPANION`].
///
/// # Errors
///
/// Returns [`DispatchError::InvalidRequest`] when the booking has no customer
/// email.
pub fn confirmation_request(
    booking: &AdminBooking,
    status: NotificationStatus,
) -> Result<BookingConfirmationRequest, DispatchError> {
    let user_email = booking
        .user_email
        .clone()
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            DispatchError::InvalidRequest(format!("booking {} has no customer email", booking.booking.id))
        })?;
    let companion_name = booking
        .companion_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMPANION.to_string());

    let row = &booking.booking;
    Ok(BookingConfirmationRequest {
        user_email,
        user_name: None,
        companion_name,
        booking_date: row.booking_date.to_string(),
        start_time: row.start_time.clone(),
        duration_hours: row.duration_hours,
        venue_name: row.venue_name.clone(),
        venue_address: row.venue_address.clone(),
        presence_nature: row.presence_nature.as_str().to_string(),
        total_amount: row.total_amount,
        status,
        booking_id: row.id.to_string(),
    })
}

/// Calls `{functions_url}/send-booking-confirmation` over HTTP
///
/// Sends the project's anon key as `apikey` and the caller's access token (or
/// the anon key) as bearer. Any non-2xx reply is a failure.
#[derive(Clone)]
pub struct HttpConfirmationDispatcher {
    client: Client,
    endpoint: String,
    anon_key: String,
    access_token: Option<String>,
}

impl HttpConfirmationDispatcher {
    /// Create a dispatcher for a functions base URL
    #[must_use]
    pub fn new(functions_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!(
                "{}/send-booking-confirmation",
                functions_url.trim_end_matches('/')
            ),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    /// Same endpoint, authenticated as the signed-in user
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Full URL requests are posted to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: BookingConfirmationRequest) -> Result<DispatchReceipt, DispatchError> {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .json(&request)
            .send()
            .await
            .map_err(|e| DispatchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DispatchReceipt>()
            .await
            .map_err(|e| DispatchError::ResponseParseFailed(e.to_string()))
    }
}

impl std::fmt::Debug for HttpConfirmationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfirmationDispatcher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ConfirmationDispatcher for HttpConfirmationDispatcher {
    fn dispatch(&self, request: BookingConfirmationRequest) -> DispatchFuture<'_> {
        Box::pin(self.post(request))
    }
}

/// Calls an in-process [`NotificationService`]
#[derive(Debug, Clone)]
pub struct LocalConfirmationDispatcher {
    service: Arc<NotificationService>,
}

impl LocalConfirmationDispatcher {
    /// Wrap a notification service
    #[must_use]
    pub const fn new(service: Arc<NotificationService>) -> Self {
        Self { service }
    }
}

impl ConfirmationDispatcher for LocalConfirmationDispatcher {
    fn dispatch(&self, request: BookingConfirmationRequest) -> DispatchFuture<'_> {
        Box::pin(async move {
            self.service
                .send_booking_confirmation(&request)
                .await
                .map_err(|e| DispatchError::Notification(e.to_string()))
        })
    }
}
