//! Which status changes email the customer, over every status pair.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use sathi_bookings::mocks::{sample_booking, InMemoryRepository, RecordingDispatcher};
use sathi_bookings::{run_status_change, AdminEnvironment, BookingId, BookingStatus};
use sathi_notifications::NotificationStatus;
use std::sync::Arc;

fn status_strategy() -> impl Strategy<Value = BookingStatus> {
    proptest::sample::select(BookingStatus::ALL.to_vec())
}

fn expected_email(from: BookingStatus, to: BookingStatus) -> Option<NotificationStatus> {
    match to {
        _ if from == to => None,
        BookingStatus::Confirmed => Some(NotificationStatus::Confirmed),
        BookingStatus::Cancelled => Some(NotificationStatus::Cancelled),
        BookingStatus::Pending | BookingStatus::Completed => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_dispatches_exactly_when_entering_an_answered_state(
        from in status_strategy(),
        to in status_strategy(),
        write_fails in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let booking = sample_booking("b1", from);
        let repository = InMemoryRepository::with_admin_booking(&booking);
        repository.set_fail_writes(write_fails);
        let dispatcher = RecordingDispatcher::new();
        let env = AdminEnvironment::new(Arc::new(repository.clone()), Arc::new(dispatcher.clone()));

        let state = runtime.block_on(run_status_change(env, booking, to));

        let statuses: Vec<_> = dispatcher.requests().iter().map(|r| r.status).collect();
        if write_fails {
            prop_assert!(statuses.is_empty());
            prop_assert_eq!(repository.status_of(&BookingId::new("b1")), Some(from));
            prop_assert!(!state.outcome.unwrap().is_written());
        } else {
            prop_assert_eq!(statuses, expected_email(from, to).into_iter().collect::<Vec<_>>());
            prop_assert_eq!(repository.status_of(&BookingId::new("b1")), Some(to));
            prop_assert!(state.outcome.unwrap().is_written());
        }
    }
}
