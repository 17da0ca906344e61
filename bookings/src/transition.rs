//! Status transition rules
//!
//! Every status change goes through [`validate_transition`]. Admins may
//! currently move a booking between any two statuses, so the function accepts
//! everything; tightening the rules means editing this one match.

use crate::types::BookingStatus;
use sathi_notifications::NotificationStatus;
use thiserror::Error;

/// A status change the rules do not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move a booking from {from} to {to}")]
pub struct TransitionError {
    /// Current status
    pub from: BookingStatus,
    /// Requested status
    pub to: BookingStatus,
}

/// Check that a booking may move from `from` to `to`
///
/// # Errors
///
/// Returns [`TransitionError`] for a disallowed change. No pair is disallowed
/// today.
pub const fn validate_transition(from: BookingStatus, to: BookingStatus) -> Result<(), TransitionError> {
    match (from, to) {
        // Admin override: any status may follow any other, including itself.
        (
            BookingStatus::Pending
            | BookingStatus::Confirmed
            | BookingStatus::Completed
            | BookingStatus::Cancelled,
            _,
        ) => Ok(()),
    }
}

/// Which customer email, if any, a status change triggers
///
/// Only a move *into* `confirmed` or `cancelled` from a different status sends
/// an email.
#[must_use]
pub fn notification_for(from: BookingStatus, to: BookingStatus) -> Option<NotificationStatus> {
    if from == to {
        return None;
    }
    match to {
        BookingStatus::Confirmed => Some(NotificationStatus::Confirmed),
        BookingStatus::Cancelled => Some(NotificationStatus::Cancelled),
        BookingStatus::Pending | BookingStatus::Completed => None,
    }
}
