//! HTTP handlers for the two notification endpoints
//!
//! ```text
//! POST /send-booking-confirmation   -> 200 {"success": true, "emailResponse": ...}
//! POST /send-booking-notification   -> 200 {"success": true, "emailResponse": ...}
//! OPTIONS either path               -> 200, empty body
//! any failure                       -> 500 {"error": "..."}
//! ```
//!
//! Bodies are read as raw bytes and parsed here so a malformed payload is
//! reported as a `500` with an `error` message, like every other failure,
//! instead of axum's default `4xx` rejection.

use crate::dispatcher::{DispatchReceipt, NotificationService};
use crate::requests::{self, BookingConfirmationRequest, BookingNotificationRequest};
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use sathi_web::{cors_layer, WebResult};
use std::sync::Arc;

/// Path of the customer confirmation endpoint
pub const CONFIRMATION_PATH: &str = "/send-booking-confirmation";

/// Path of the admin notification endpoint
pub const NOTIFICATION_PATH: &str = "/send-booking-notification";

/// Build the notification router with its CORS layer applied
pub fn router(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route(CONFIRMATION_PATH, post(send_booking_confirmation))
        .route(NOTIFICATION_PATH, post(send_booking_notification))
        .layer(cors_layer())
        .with_state(service)
}

/// `POST /send-booking-confirmation`
///
/// # Errors
///
/// Any parse, validation or provider failure becomes a `500`.
pub async fn send_booking_confirmation(
    State(service): State<Arc<NotificationService>>,
    body: Bytes,
) -> WebResult<Json<DispatchReceipt>> {
    let request: BookingConfirmationRequest = requests::parse(&body)?;
    let receipt = service.send_booking_confirmation(&request).await?;
    Ok(Json(receipt))
}

/// `POST /send-booking-notification`
///
/// # Errors
///
/// Any parse or provider failure becomes a `500`.
pub async fn send_booking_notification(
    State(service): State<Arc<NotificationService>>,
    body: Bytes,
) -> WebResult<Json<DispatchReceipt>> {
    let request: BookingNotificationRequest = requests::parse(&body)?;
    let receipt = service.send_booking_notification(&request).await?;
    Ok(Json(receipt))
}
