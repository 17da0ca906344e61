//! The signed-in customer's bookings.

use super::{auth_error, store, store_error};
use crate::state::AppState;
use axum::{extract::State, Json};
use sathi_bookings::BookingWithCompanion;
use sathi_web::{BearerToken, WebResult};

/// `GET /api/bookings`: the caller's bookings, latest booking date first
///
/// # Errors
///
/// Returns `401` for a missing or rejected token and `502` if the store
/// cannot be read.
pub async fn list_my_bookings(
    State(state): State<AppState>,
    token: BearerToken,
) -> WebResult<Json<Vec<BookingWithCompanion>>> {
    let services = store(&state)?;
    let user = services.auth.user(token.as_str()).await.map_err(auth_error)?;

    let bookings = services
        .repositories
        .for_caller(Some(token.as_str()))
        .list_user_bookings(&user.id)
        .await
        .map_err(store_error)?;

    tracing::debug!(user_id = %user.id, count = bookings.len(), "Listed customer bookings");
    Ok(Json(bookings))
}
