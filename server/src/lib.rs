//! # Sathi Server
//!
//! Application shell for the Sathi booking backend: configuration, shared
//! state, the HTTP router and the admin console's building blocks.
//!
//! ```ignore
//! let config = Config::from_env()?;
//! let app = build_router(AppState::from_config(&config));
//! axum::serve(listener, app).await?;
//! ```

pub mod api;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{AdminCredentials, Config, ConfigError, EmailProviderKind};
pub use routes::build_router;
pub use state::{AppState, RepositorySource, StoreServices};
