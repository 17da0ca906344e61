//! HTTP handlers shared by every Sathi service.

pub mod health;

pub use health::{health_check, HealthResponse};
