//! Admin booking list and status changes.
//!
//! ```text
//! GET  /api/admin/bookings             -> 200 [AdminBooking, ...]
//! POST /api/admin/bookings/:id/status  {"status": "confirmed"}
//!                                      -> 200 {"outcome": {...}, "message": "...", "bookings": [...]}
//! ```

use super::{store, store_error};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sathi_bookings::{
    run_status_change, AdminBooking, AdminEnvironment, AdminOutcome, BookingId, BookingStatus,
    LocalConfirmationDispatcher,
};
use sathi_web::{AppError, BearerToken, WebResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of a status change
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    /// `pending`, `confirmed`, `completed` or `cancelled`
    pub status: String,
}

/// Result of a status change
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeResponse {
    /// What happened
    pub outcome: AdminOutcome,
    /// Toast text
    pub message: String,
    /// Booking list re-read after the change
    pub bookings: Vec<AdminBooking>,
    /// Set when the re-read failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

/// `GET /api/admin/bookings`: every booking, newest first
///
/// # Errors
///
/// Returns `401` without a bearer token, `403` when the store's policy refuses
/// the caller and `502` if the store cannot be read.
pub async fn list_bookings(
    State(state): State<AppState>,
    token: BearerToken,
) -> WebResult<Json<Vec<AdminBooking>>> {
    let bookings = store(&state)?
        .repositories
        .for_caller(Some(token.as_str()))
        .list_admin_bookings()
        .await
        .map_err(store_error)?;

    Ok(Json(bookings))
}

/// `POST /api/admin/bookings/:id/status`
///
/// Runs the status controller for one booking with the in-process
/// confirmation dispatcher. A written status answers `200` even when the email
/// failed; a refused write answers `502` and a refused transition `422`, both
/// with the same body shape.
///
/// # Errors
///
/// Returns `422` for a malformed body or an unknown status, `404` for an
/// unknown booking and the store's error when the booking cannot be looked up.
pub async fn change_status(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<String>,
    body: Bytes,
) -> WebResult<(StatusCode, Json<StatusChangeResponse>)> {
    let request: StatusChangeRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid status change body: {e}")))?;
    let status = request
        .status
        .parse::<BookingStatus>()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repository = store(&state)?.repositories.for_caller(Some(token.as_str()));
    let booking_id = BookingId::new(id);
    let booking = repository
        .list_admin_bookings()
        .await
        .map_err(store_error)?
        .into_iter()
        .find(|b| b.booking.id == booking_id)
        .ok_or_else(|| AppError::not_found("Booking", &booking_id))?;

    let env = AdminEnvironment::new(
        repository,
        Arc::new(LocalConfirmationDispatcher::new(Arc::clone(&state.notifications))),
    );
    let admin = run_status_change(env, booking, status).await;

    let outcome = admin
        .outcome
        .ok_or_else(|| AppError::internal("Status change finished without an outcome"))?;
    let code = match &outcome {
        AdminOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AdminOutcome::UpdateFailed => StatusCode::BAD_GATEWAY,
        AdminOutcome::Notified { .. }
        | AdminOutcome::NotificationFailed { .. }
        | AdminOutcome::Updated { .. } => StatusCode::OK,
    };

    tracing::info!(booking_id = %booking_id, status = %status, outcome = ?outcome, "Status change handled");
    Ok((
        code,
        Json(StatusChangeResponse {
            message: outcome.message(),
            outcome,
            bookings: admin.bookings,
            fetch_error: admin.fetch_error,
        }),
    ))
}
