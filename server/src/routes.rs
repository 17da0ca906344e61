//! Router configuration.

use crate::api::{admin, bookings, companions};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sathi_notifications::http as notifications;
use sathi_web::{correlation_id_layer, health_check};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Prefix the deployed notification functions live under
pub const FUNCTIONS_PREFIX: &str = "/functions/v1";

/// Body of `GET /ready`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReadinessResponse {
    /// Always `ok` once the process serves requests
    pub status: &'static str,
    /// `resend`, `smtp` or `console`
    pub email_provider: &'static str,
    /// Whether the booking routes are mounted
    pub store_configured: bool,
}

/// `GET /ready`
#[allow(clippy::unused_async)]
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ok",
            email_provider: state.email_provider.as_str(),
            store_configured: state.store.is_some(),
        }),
    )
}

/// Build the complete router.
///
/// - `/health`, `/ready`
/// - the notification endpoints, at the root and under [`FUNCTIONS_PREFIX`]
/// - `/api/...` booking endpoints, only when the store is configured
pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check));

    if state.store.is_some() {
        let api = Router::new()
            .route("/companions", get(companions::list_companions))
            .route("/bookings", get(bookings::list_my_bookings))
            .route("/admin/bookings", get(admin::list_bookings))
            .route("/admin/bookings/:id/status", post(admin::change_status));
        app = app.nest("/api", api);
    } else {
        tracing::info!("Booking store not configured, serving notification endpoints only");
    }

    let app = app.with_state(state.clone());

    app.merge(notifications::router(state.notifications.clone()))
        .nest(FUNCTIONS_PREFIX, notifications::router(state.notifications))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
}
