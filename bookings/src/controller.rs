//! Booking status controller
//!
//! Drives the admin's "change status" button as a reducer: write the new
//! status, send the customer a confirmation email when the change calls for
//! one, then re-read the booking list. The steps run strictly one after the
//! other, each step's result arriving as the next action.
//!
//! The email is best effort. A failed dispatch degrades the outcome message but
//! never undoes the write, and nothing is retried.
//!
//! ```ignore
//! let store = Store::new(AdminState::default(), AdminReducer::new(), env);
//! let mut handle = store
//!     .send(AdminAction::ChangeStatus { booking, status: BookingStatus::Confirmed })
//!     .await;
//! handle.wait().await;
//! let message = store.state(|s| s.outcome.as_ref().map(AdminOutcome::message)).await;
//! ```

use crate::dispatcher::{confirmation_request, ConfirmationDispatcher};
use crate::repository::BookingRepository;
use crate::transition::{notification_for, validate_transition};
use crate::types::{AdminBooking, BookingId, BookingStatus};
use sathi_core::effect::Effect;
use sathi_core::reducer::Reducer;
use sathi_core::{smallvec, try_effect, SmallVec};
use sathi_runtime::Store;
use serde::Serialize;
use std::sync::Arc;

/// Message shown when the booking list cannot be read
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch bookings";

/// What the admin is told after a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdminOutcome {
    /// Transition rules refused the change; nothing was written
    Rejected {
        /// Why
        reason: String,
    },
    /// The store write failed; status unchanged
    UpdateFailed,
    /// Written and the customer was emailed
    Notified {
        /// New status
        status: BookingStatus,
        /// Where the email went
        email: String,
    },
    /// Written, but the email may not have gone out
    NotificationFailed {
        /// New status
        status: BookingStatus,
    },
    /// Written; this change sends no email
    Updated {
        /// New status
        status: BookingStatus,
    },
}

impl AdminOutcome {
    /// Toast text for the admin view
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { reason } => reason.clone(),
            Self::UpdateFailed => "Failed to update booking status".to_string(),
            Self::Notified { status, email } => format!("Booking {status}! Email sent to {email}"),
            Self::NotificationFailed { status } => {
                format!("Booking {status}! (Email notification may have failed)")
            },
            Self::Updated { .. } => "Booking status updated".to_string(),
        }
    }

    /// Whether the new status reached the store
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(
            self,
            Self::Notified { .. } | Self::NotificationFailed { .. } | Self::Updated { .. }
        )
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "rejected",
            Self::UpdateFailed => "update_failed",
            Self::Notified { .. } => "notified",
            Self::NotificationFailed { .. } => "notification_failed",
            Self::Updated { .. } => "updated",
        }
    }
}

/// The admin view's local state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    /// Every booking, newest first, as of the last successful read
    pub bookings: Vec<AdminBooking>,
    /// A read is in flight
    pub loading: bool,
    /// Booking whose status change is in flight
    pub updating: Option<BookingId>,
    /// Result of the last status change
    pub outcome: Option<AdminOutcome>,
    /// Set when the last read failed
    pub fetch_error: Option<String>,
}

impl AdminState {
    /// Look up a booking in the local list
    #[must_use]
    pub fn booking(&self, id: &BookingId) -> Option<&AdminBooking> {
        self.bookings.iter().find(|b| &b.booking.id == id)
    }
}

/// Inputs to [`AdminReducer`]
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    /// Re-read the booking list
    Refresh,
    /// Admin picked a new status for a booking
    ChangeStatus {
        /// Snapshot of the booking as the admin saw it
        booking: AdminBooking,
        /// Requested status
        status: BookingStatus,
    },
    /// The store accepted the write
    StatusWritten {
        /// Snapshot taken before the write
        booking: AdminBooking,
        /// Status that was written
        status: BookingStatus,
    },
    /// The store write failed
    StatusWriteFailed {
        /// Booking that kept its old status
        booking_id: BookingId,
        /// Error text
        reason: String,
    },
    /// The confirmation email was handed off
    NotificationSent {
        /// Status the email announced
        status: BookingStatus,
        /// Recipient
        email: String,
    },
    /// The confirmation email could not be handed off
    NotificationFailed {
        /// Status that was written
        status: BookingStatus,
        /// Error text
        reason: String,
    },
    /// Fresh booking list from the store
    BookingsLoaded {
        /// Newest first
        bookings: Vec<AdminBooking>,
    },
    /// The booking list could not be read
    BookingsLoadFailed {
        /// Error text
        reason: String,
    },
}

/// Dependencies of [`AdminReducer`]
#[derive(Clone)]
pub struct AdminEnvironment {
    /// Store client, acting as the signed-in admin
    pub repository: Arc<dyn BookingRepository>,
    /// Confirmation email seam
    pub dispatcher: Arc<dyn ConfirmationDispatcher>,
}

impl AdminEnvironment {
    /// Bundle a repository and a dispatcher
    #[must_use]
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        dispatcher: Arc<dyn ConfirmationDispatcher>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

impl std::fmt::Debug for AdminEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the admin booking view
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminReducer;

impl AdminReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch_bookings(env: &AdminEnvironment) -> Effect<AdminAction> {
        let repository = Arc::clone(&env.repository);
        try_effect! {
            call: repository.list_admin_bookings(),
            on_success: |bookings| AdminAction::BookingsLoaded { bookings },
            on_error: |error| AdminAction::BookingsLoadFailed { reason: error.to_string() }
        }
    }

    fn write_status(
        env: &AdminEnvironment,
        booking: AdminBooking,
        status: BookingStatus,
    ) -> Effect<AdminAction> {
        let repository = Arc::clone(&env.repository);
        let booking_id = booking.booking.id.clone();
        try_effect! {
            call: repository.update_status(&booking_id, status),
            on_success: |()| AdminAction::StatusWritten { booking, status },
            on_error: |error| AdminAction::StatusWriteFailed {
                booking_id: booking_id.clone(),
                reason: error.to_string(),
            }
        }
    }

    /// Effect for a successful write: notify if the change calls for it,
    /// otherwise go straight to the re-read
    fn after_write(
        state: &mut AdminState,
        booking: &AdminBooking,
        status: BookingStatus,
        env: &AdminEnvironment,
    ) -> Effect<AdminAction> {
        let Some(notification) = notification_for(booking.booking.status, status) else {
            Self::finish(state, AdminOutcome::Updated { status });
            return Self::fetch_bookings(env);
        };

        match confirmation_request(booking, notification) {
            Ok(request) => {
                let dispatcher = Arc::clone(&env.dispatcher);
                let email = request.user_email.clone();
                try_effect! {
                    call: dispatcher.dispatch(request),
                    on_success: |_receipt| AdminAction::NotificationSent { status, email },
                    on_error: |error| AdminAction::NotificationFailed {
                        status,
                        reason: error.to_string(),
                    }
                }
            },
            Err(error) => {
                Self::notification_failed(state, booking.booking.id.as_str(), status, &error.to_string());
                Self::fetch_bookings(env)
            },
        }
    }

    fn notification_failed(state: &mut AdminState, booking_id: &str, status: BookingStatus, reason: &str) {
        tracing::warn!(
            booking_id,
            status = %status,
            error = reason,
            "Status written but confirmation email failed"
        );
        Self::finish(state, AdminOutcome::NotificationFailed { status });
    }

    fn finish(state: &mut AdminState, outcome: AdminOutcome) {
        metrics::counter!("bookings.status_changes", "outcome" => outcome.label()).increment(1);
        state.outcome = Some(outcome);
    }
}

impl Reducer for AdminReducer {
    type State = AdminState;
    type Action = AdminAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut AdminState,
        action: AdminAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<AdminAction>; 4]> {
        match action {
            AdminAction::Refresh => {
                state.loading = true;
                smallvec![Self::fetch_bookings(env)]
            },

            AdminAction::ChangeStatus { booking, status } => {
                if let Err(error) = validate_transition(booking.booking.status, status) {
                    tracing::info!(booking_id = %booking.booking.id, %error, "Status change rejected");
                    Self::finish(state, AdminOutcome::Rejected { reason: error.to_string() });
                    return smallvec![Effect::None];
                }

                tracing::info!(
                    booking_id = %booking.booking.id,
                    from = %booking.booking.status,
                    to = %status,
                    "Changing booking status"
                );
                state.updating = Some(booking.booking.id.clone());
                state.outcome = None;
                smallvec![Self::write_status(env, booking, status)]
            },

            AdminAction::StatusWritten { booking, status } => {
                smallvec![Self::after_write(state, &booking, status, env)]
            },

            AdminAction::StatusWriteFailed { booking_id, reason } => {
                tracing::error!(booking_id = %booking_id, error = %reason, "Status write failed");
                state.updating = None;
                Self::finish(state, AdminOutcome::UpdateFailed);
                smallvec![Effect::None]
            },

            AdminAction::NotificationSent { status, email } => {
                tracing::info!(status = %status, "Confirmation email sent");
                Self::finish(state, AdminOutcome::Notified { status, email });
                smallvec![Self::fetch_bookings(env)]
            },

            AdminAction::NotificationFailed { status, reason } => {
                let booking_id = state
                    .updating
                    .as_ref()
                    .map_or_else(String::new, ToString::to_string);
                Self::notification_failed(state, &booking_id, status, &reason);
                smallvec![Self::fetch_bookings(env)]
            },

            AdminAction::BookingsLoaded { bookings } => {
                tracing::debug!(count = bookings.len(), "Booking list refreshed");
                state.bookings = bookings;
                state.loading = false;
                state.updating = None;
                state.fetch_error = None;
                smallvec![Effect::None]
            },

            AdminAction::BookingsLoadFailed { reason } => {
                tracing::error!(error = %reason, "Failed to fetch bookings");
                state.loading = false;
                state.updating = None;
                state.fetch_error = Some(FETCH_FAILED_MESSAGE.to_string());
                smallvec![Effect::None]
            },
        }
    }
}

/// Run one status change to completion on a fresh store
///
/// Returns the admin state once the write, the email and the re-read have all
/// settled.
pub async fn run_status_change(
    env: AdminEnvironment,
    booking: AdminBooking,
    status: BookingStatus,
) -> AdminState {
    let store = Store::new(AdminState::default(), AdminReducer::new(), env);
    let mut handle = store
        .send(AdminAction::ChangeStatus { booking, status })
        .await;
    handle.wait().await;
    store.state(Clone::clone).await
}

/// Load the admin booking list on a fresh store
///
/// A failed read shows up as [`AdminState::fetch_error`].
pub async fn load_bookings(env: AdminEnvironment) -> AdminState {
    let store = Store::new(AdminState::default(), AdminReducer::new(), env);
    let mut handle = store.send(AdminAction::Refresh).await;
    handle.wait().await;
    store.state(Clone::clone).await
}

#[cfg(all(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mocks::{sample_booking, InMemoryRepository, RecordingDispatcher};
    use sathi_testing::assertions::{assert_has_future_effect, assert_no_effects};
    use sathi_testing::ReducerTest;

    fn environment() -> AdminEnvironment {
        AdminEnvironment::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(RecordingDispatcher::new()),
        )
    }

    #[test]
    fn test_change_status_marks_booking_in_flight() {
        let booking = sample_booking("b1", BookingStatus::Pending);

        ReducerTest::new(AdminReducer::new())
            .with_env(environment())
            .given_state(AdminState::default())
            .when_action(AdminAction::ChangeStatus {
                booking,
                status: BookingStatus::Confirmed,
            })
            .then_state(|state| {
                assert_eq!(state.updating, Some(BookingId::new("b1")));
                assert_eq!(state.outcome, None);
            })
            .then_effects(assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_write_failure_reports_and_stops() {
        ReducerTest::new(AdminReducer::new())
            .with_env(environment())
            .given_state(AdminState {
                updating: Some(BookingId::new("b1")),
                ..AdminState::default()
            })
            .when_action(AdminAction::StatusWriteFailed {
                booking_id: BookingId::new("b1"),
                reason: "API error (status 403): denied".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.outcome, Some(AdminOutcome::UpdateFailed));
                assert_eq!(state.updating, None);
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn test_unbuildable_request_degrades_to_notification_failed() {
        let mut booking = sample_booking("b1", BookingStatus::Pending);
        booking.user_email = None;

        ReducerTest::new(AdminReducer::new())
            .with_env(environment())
            .given_state(AdminState::default())
            .when_action(AdminAction::StatusWritten {
                booking,
                status: BookingStatus::Cancelled,
            })
            .then_state(|state| {
                assert_eq!(
                    state.outcome,
                    Some(AdminOutcome::NotificationFailed {
                        status: BookingStatus::Cancelled
                    })
                );
            })
            .then_effects(assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_failed_read_keeps_outcome() {
        let outcome = AdminOutcome::Updated {
            status: BookingStatus::Completed,
        };

        ReducerTest::new(AdminReducer::new())
            .with_env(environment())
            .given_state(AdminState {
                outcome: Some(outcome.clone()),
                ..AdminState::default()
            })
            .when_action(AdminAction::BookingsLoadFailed {
                reason: "Request failed: connection refused".to_string(),
            })
            .then_state(move |state| {
                assert_eq!(state.outcome, Some(outcome));
                assert_eq!(state.fetch_error.as_deref(), Some(FETCH_FAILED_MESSAGE));
            })
            .run();
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AdminOutcome::Notified {
                status: BookingStatus::Confirmed,
                email: "asha@example.com".to_string()
            }
            .message(),
            "Booking confirmed! Email sent to asha@example.com"
        );
        assert_eq!(
            AdminOutcome::NotificationFailed {
                status: BookingStatus::Cancelled
            }
            .message(),
            "Booking cancelled! (Email notification may have failed)"
        );
        assert_eq!(
            AdminOutcome::Updated {
                status: BookingStatus::Completed
            }
            .message(),
            "Booking status updated"
        );
        assert_eq!(AdminOutcome::UpdateFailed.message(), "Failed to update booking status");
    }

    #[test]
    fn test_outcome_serializes_with_kind() {
        let json = serde_json::to_value(AdminOutcome::NotificationFailed {
            status: BookingStatus::Confirmed,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "notification_failed", "status": "confirmed"})
        );
    }
}
