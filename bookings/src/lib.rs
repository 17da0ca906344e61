//! # Sathi Bookings
//!
//! Everything between the admin's "change status" button and the data store:
//!
//! - [`types`]: booking, companion and profile rows
//! - [`repository`]: typed queries against the hosted store
//! - [`transition`]: which status changes are allowed and which send email
//! - [`controller`]: the status-change reducer (write, notify, re-read)
//! - [`dispatcher`]: how the controller reaches the confirmation email
//! - [`session`]: sign-in and the explicit session context
//!
//! ## Example
//!
//! ```ignore
//! use sathi_bookings::controller::{AdminAction, AdminEnvironment, AdminReducer, AdminState};
//! use sathi_runtime::Store;
//!
//! let env = AdminEnvironment::new(Arc::new(repository), Arc::new(dispatcher));
//! let store = Store::new(AdminState::default(), AdminReducer::new(), env);
//! store.send(AdminAction::Refresh).await.wait().await;
//! ```

pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod repository;
pub mod session;
pub mod transition;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use controller::{
    load_bookings, run_status_change, AdminAction, AdminEnvironment, AdminOutcome, AdminReducer,
    AdminState,
};
pub use dispatcher::{
    confirmation_request, ConfirmationDispatcher, HttpConfirmationDispatcher,
    LocalConfirmationDispatcher, UNKNOWN_COMPANION,
};
pub use error::{AuthError, DispatchError, RepositoryError};
pub use repository::{BookingRepository, PostgrestRepository};
pub use session::{AuthClient, Session, SessionContext, SessionUser};
pub use transition::{notification_for, validate_transition, TransitionError};
pub use types::{
    AdminBooking, Booking, BookingId, BookingStatus, BookingWithCompanion, Companion, CompanionId,
    EnergyType, PresenceNature, Profile, UserId,
};
