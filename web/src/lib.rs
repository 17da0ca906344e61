//! Axum plumbing shared by the Sathi HTTP services.
//!
//! Handlers stay thin: they parse the request, hand the work to a domain
//! service or a store, and map the outcome to
//! a response. Everything around that lives here:
//!
//! - [`AppError`]: the error type every handler returns, rendered as
//!   `{"error": ..., "code": ...}`
//! - [`cors_layer`]: the permissive CORS headers and `OPTIONS` short-circuit the
//!   booking web client relies on
//! - [`correlation_id_layer`] and [`CorrelationId`]: request correlation
//! - [`BearerToken`]: the caller's access token
//! - [`health_check`]: liveness
//!
//! # Example
//!
//! ```ignore
//! use sathi_web::{cors_layer, correlation_id_layer, AppError, WebResult};
//!
//! async fn send_booking_notification(body: Bytes) -> WebResult<Json<SendResponse>> {
//!     let request = serde_json::from_slice(&body).map_err(|e| AppError::internal(e.to_string()))?;
//!     ...
//! }
//!
//! let app = Router::new()
//!     .route("/send-booking-notification", post(send_booking_notification))
//!     .layer(cors_layer())
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cors;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use cors::{cors_layer, CorsHeadersLayer};
pub use error::AppError;
pub use extractors::{BearerToken, CorrelationId};
pub use handlers::{health_check, HealthResponse};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
