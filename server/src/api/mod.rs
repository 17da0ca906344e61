//! JSON endpoints over the data store.
//!
//! Every handler runs with the caller's bearer token (or the anon role for
//! public reads); authorization is the data store's row-level policy.

pub mod admin;
pub mod bookings;
pub mod companions;

use crate::state::{AppState, StoreServices};
use axum::http::StatusCode;
use sathi_bookings::{AuthError, RepositoryError};
use sathi_web::AppError;

/// Store clients, or `503` when the store is not configured
///
/// Routes using this are only mounted with a configured store, so the error
/// path is for state built by hand.
fn store(state: &AppState) -> Result<&StoreServices, AppError> {
    state
        .store
        .as_ref()
        .ok_or_else(|| AppError::unavailable("Booking store is not configured"))
}

/// Map a store failure onto the HTTP boundary
fn store_error(error: RepositoryError) -> AppError {
    let mapped = match &error {
        RepositoryError::Api { status: 401, .. } => AppError::unauthorized("Not signed in or session expired"),
        RepositoryError::Api { status: 403, .. } => AppError::new(
            StatusCode::FORBIDDEN,
            "Not allowed".to_string(),
            "FORBIDDEN".to_string(),
        ),
        _ => AppError::bad_gateway("Booking store request failed"),
    };
    mapped.with_source(error.into())
}

/// Map an auth failure onto the HTTP boundary
fn auth_error(error: AuthError) -> AppError {
    match error {
        AuthError::Unauthorized | AuthError::InvalidCredentials => {
            AppError::unauthorized(error.to_string())
        },
        other => AppError::bad_gateway("Auth service request failed").with_source(other.into()),
    }
}
