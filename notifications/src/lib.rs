//! # Sathi Notifications
//!
//! Booking emails for the Sathi companion marketplace:
//!
//! - a customer email when an admin confirms or cancels a booking
//!   (`send-booking-confirmation`)
//! - an admin email when a customer requests a booking
//!   (`send-booking-notification`)
//!
//! Each request is rendered by [`templates`], addressed by the
//! [`NotificationService`] and delivered through an [`EmailProvider`]. The
//! provider's response is relayed to the caller unchanged.
//!
//! ## Example
//!
//! ```ignore
//! use sathi_notifications::{http, providers::ResendEmailProvider, NotificationService};
//! use sathi_core::environment::SystemClock;
//!
//! let service = NotificationService::new(
//!     Arc::new(ResendEmailProvider::new(api_key)),
//!     Arc::new(SystemClock),
//! );
//! let app = http::router(Arc::new(service));
//! ```

pub mod dispatcher;
pub mod email;
pub mod error;
pub mod http;
pub mod providers;
pub mod requests;
pub mod templates;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use dispatcher::{DispatchReceipt, NotificationService, DEFAULT_ADMIN_RECIPIENT, DEFAULT_SENDER};
pub use email::{EmailProvider, OutgoingEmail};
pub use error::NotificationError;
pub use requests::{BookingConfirmationRequest, BookingNotificationRequest, NotificationStatus};
