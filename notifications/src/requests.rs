//! Request payloads accepted by the two notification endpoints
//!
//! Field names are camelCase on the wire; the booking web client and the status
//! controller both build these from a booking snapshot.

use crate::error::{NotificationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome announced to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Booking accepted
    Confirmed,
    /// Booking declined or withdrawn
    Cancelled,
}

impl NotificationStatus {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for `send-booking-confirmation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmationRequest {
    /// Customer address, the only recipient
    pub user_email: String,
    /// Customer display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Companion display name
    pub companion_name: String,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    /// Booked duration in hours
    pub duration_hours: f64,
    /// Venue name
    pub venue_name: String,
    /// Venue street address
    pub venue_address: String,
    /// Presence nature tag, e.g. `silent_observant`
    pub presence_nature: String,
    /// Total in rupees
    pub total_amount: f64,
    /// New status being announced
    pub status: NotificationStatus,
    /// Full booking id (only a prefix is shown)
    pub booking_id: String,
}

impl BookingConfirmationRequest {
    /// Reject requests that cannot be delivered
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidRequest`] when the recipient or the
    /// booking id is blank.
    pub fn validate(&self) -> Result<()> {
        if self.user_email.trim().is_empty() {
            return Err(NotificationError::InvalidRequest(
                "userEmail must not be empty".to_string(),
            ));
        }
        if self.booking_id.trim().is_empty() {
            return Err(NotificationError::InvalidRequest(
                "bookingId must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload for `send-booking-notification`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotificationRequest {
    /// Customer identifier shown to the admin (the web client sends the email)
    pub user_name: String,
    /// Companion display name
    pub companion_name: String,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    /// Venue name
    pub venue_name: String,
    /// Venue street address
    pub venue_address: String,
    /// Presence nature tag
    pub presence_nature: String,
    /// Total in rupees
    pub total_amount: f64,
    /// Free-text notes from the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    /// Full booking id
    pub booking_id: String,
}

/// Parse a request body, mapping any serde failure to [`NotificationError::InvalidRequest`]
///
/// # Errors
///
/// Returns [`NotificationError::InvalidRequest`] when the body is not valid JSON
/// or misses a required field.
pub fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| NotificationError::InvalidRequest(e.to_string()))
}
