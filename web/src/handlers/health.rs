//! Health check endpoints.
//!
//! `GET /health` is liveness only: it never touches a dependency. Readiness
//! probes that need to check the data store live with the service that owns
//! the store client and reuse [`HealthResponse`].

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Body returned by health endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: &'static str,
    /// Crate version serving the request
    pub version: &'static str,
}

impl HealthResponse {
    /// Healthy response.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Unhealthy response.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            status: "unavailable",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Liveness endpoint.
///
/// ```text
/// GET /health
/// 200 {"status": "ok", "version": "0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse::ok()))
}
