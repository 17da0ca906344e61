//! Status controller driven through the Store runtime.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sathi_bookings::controller::FETCH_FAILED_MESSAGE;
use sathi_bookings::mocks::{sample_booking, InMemoryRepository, RecordingDispatcher};
use sathi_bookings::{
    AdminAction, AdminBooking, AdminEnvironment, AdminOutcome, AdminReducer, AdminState, BookingId,
    BookingStatus, LocalConfirmationDispatcher, UNKNOWN_COMPANION,
};
use sathi_notifications::mocks::MockEmailProvider;
use sathi_notifications::{NotificationService, NotificationStatus};
use sathi_runtime::Store;
use sathi_testing::{init_test_tracing, test_clock};
use std::sync::Arc;

type AdminStore = Store<AdminState, AdminAction, AdminEnvironment, AdminReducer>;

fn store(repository: &InMemoryRepository, dispatcher: &RecordingDispatcher) -> AdminStore {
    init_test_tracing();
    let env = AdminEnvironment::new(Arc::new(repository.clone()), Arc::new(dispatcher.clone()));
    Store::new(AdminState::default(), AdminReducer::new(), env)
}

async fn change_status(store: &AdminStore, booking: AdminBooking, status: BookingStatus) {
    let mut handle = store
        .send(AdminAction::ChangeStatus { booking, status })
        .await;
    handle.wait().await;
}

async fn outcome(store: &AdminStore) -> Option<AdminOutcome> {
    store.state(|s| s.outcome.clone()).await
}

#[tokio::test]
async fn test_confirming_dispatches_one_matching_email() {
    let booking = sample_booking("b1", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking.clone(), BookingStatus::Confirmed).await;

    let requests = dispatcher.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.status, NotificationStatus::Confirmed);
    assert_eq!(request.user_email, "asha@example.com");
    assert_eq!(request.companion_name, "Meera");
    assert_eq!(request.booking_id, "b1");
    assert_eq!(request.venue_name, booking.booking.venue_name);
    assert!((request.total_amount - booking.booking.total_amount).abs() < f64::EPSILON);

    assert_eq!(
        outcome(&store).await.unwrap().message(),
        "Booking confirmed! Email sent to asha@example.com"
    );
    assert_eq!(
        repository.status_of(&BookingId::new("b1")),
        Some(BookingStatus::Confirmed)
    );
}

#[tokio::test]
async fn test_cancelling_dispatches_cancelled_email() {
    let booking = sample_booking("b1", BookingStatus::Confirmed);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking, BookingStatus::Cancelled).await;

    let requests = dispatcher.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].status, NotificationStatus::Cancelled);
}

#[tokio::test]
async fn test_no_email_for_same_status_or_non_notifying_targets() {
    let cases = [
        (BookingStatus::Confirmed, BookingStatus::Confirmed),
        (BookingStatus::Cancelled, BookingStatus::Cancelled),
        (BookingStatus::Pending, BookingStatus::Completed),
        (BookingStatus::Confirmed, BookingStatus::Completed),
        (BookingStatus::Cancelled, BookingStatus::Pending),
    ];

    for (from, to) in cases {
        let booking = sample_booking("b1", from);
        let repository = InMemoryRepository::with_admin_booking(&booking);
        let dispatcher = RecordingDispatcher::new();
        let store = store(&repository, &dispatcher);

        change_status(&store, booking, to).await;

        assert!(dispatcher.requests().is_empty(), "{from} -> {to} dispatched");
        assert_eq!(repository.writes(), vec![(BookingId::new("b1"), to)]);
        assert_eq!(
            outcome(&store).await,
            Some(AdminOutcome::Updated { status: to })
        );
    }
}

#[tokio::test]
async fn test_write_failure_keeps_status_and_skips_dispatch() {
    let booking = sample_booking("b1", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    repository.set_fail_writes(true);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking.clone(), BookingStatus::Confirmed).await;

    assert!(dispatcher.requests().is_empty());
    assert_eq!(
        repository.status_of(&BookingId::new("b1")),
        Some(BookingStatus::Pending)
    );
    assert_eq!(outcome(&store).await, Some(AdminOutcome::UpdateFailed));
    // No re-read after a failed write: the local list was never loaded.
    assert!(store.state(|s| s.bookings.is_empty()).await);
}

#[tokio::test]
async fn test_dispatch_failure_keeps_write_and_degrades() {
    let booking = sample_booking("b1", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let dispatcher = RecordingDispatcher::failing();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking, BookingStatus::Confirmed).await;

    assert_eq!(dispatcher.requests().len(), 1);
    assert_eq!(
        repository.status_of(&BookingId::new("b1")),
        Some(BookingStatus::Confirmed)
    );
    let outcome = outcome(&store).await.unwrap();
    assert!(outcome.is_written());
    assert_eq!(
        outcome.message(),
        "Booking confirmed! (Email notification may have failed)"
    );
}

#[tokio::test]
async fn test_booking_without_email_degrades_without_dispatch() {
    let mut booking = sample_booking("b1", BookingStatus::Pending);
    booking.user_email = None;
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking, BookingStatus::Cancelled).await;

    assert!(dispatcher.requests().is_empty());
    assert_eq!(
        outcome(&store).await,
        Some(AdminOutcome::NotificationFailed {
            status: BookingStatus::Cancelled
        })
    );
}

#[tokio::test]
async fn test_booking_without_companion_still_dispatches_once() {
    let mut booking = sample_booking("b1", BookingStatus::Pending);
    booking.companion_name = None;
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking, BookingStatus::Confirmed).await;

    let requests = dispatcher.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].companion_name, UNKNOWN_COMPANION);
    assert_eq!(requests[0].user_email, "asha@example.com");
    assert_eq!(
        outcome(&store).await.unwrap().message(),
        "Booking confirmed! Email sent to asha@example.com"
    );
}

#[tokio::test]
async fn test_successful_write_reloads_list_newest_first() {
    let older = sample_booking("a", BookingStatus::Pending);
    let newer = sample_booking("b", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&older);
    repository.insert_admin_booking(&newer);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, older, BookingStatus::Completed).await;

    let (ids, statuses, updating) = store
        .state(|s| {
            (
                s.bookings.iter().map(|b| b.booking.id.to_string()).collect::<Vec<_>>(),
                s.bookings.iter().map(|b| b.booking.status).collect::<Vec<_>>(),
                s.updating.clone(),
            )
        })
        .await;
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(statuses, vec![BookingStatus::Pending, BookingStatus::Completed]);
    assert_eq!(updating, None);
}

#[tokio::test]
async fn test_failed_reload_reports_fetch_error_and_keeps_outcome() {
    let booking = sample_booking("b1", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    repository.set_fail_reads(true);
    let dispatcher = RecordingDispatcher::new();
    let store = store(&repository, &dispatcher);

    change_status(&store, booking, BookingStatus::Confirmed).await;

    let (fetch_error, outcome) = store
        .state(|s| (s.fetch_error.clone(), s.outcome.clone()))
        .await;
    assert_eq!(fetch_error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert!(matches!(outcome, Some(AdminOutcome::Notified { .. })));
}

#[tokio::test]
async fn test_refresh_loads_every_booking() {
    let repository = InMemoryRepository::with_admin_booking(&sample_booking("a", BookingStatus::Pending));
    repository.insert_admin_booking(&sample_booking("b", BookingStatus::Cancelled));
    let store = store(&repository, &RecordingDispatcher::new());

    let mut handle = store.send(AdminAction::Refresh).await;
    handle.wait().await;

    let (count, loading) = store.state(|s| (s.bookings.len(), s.loading)).await;
    assert_eq!(count, 2);
    assert!(!loading);
}

#[tokio::test]
async fn test_in_process_dispatcher_sends_rendered_email() {
    init_test_tracing();
    let booking = sample_booking("0f8fad5b-d9cb-469f-a165-70867728950e", BookingStatus::Pending);
    let repository = InMemoryRepository::with_admin_booking(&booking);
    let provider = MockEmailProvider::new();
    let service = NotificationService::new(Arc::new(provider.clone()), Arc::new(test_clock()));
    let env = AdminEnvironment::new(
        Arc::new(repository),
        Arc::new(LocalConfirmationDispatcher::new(Arc::new(service))),
    );
    let store = Store::new(AdminState::default(), AdminReducer::new(), env);

    change_status(&store, booking, BookingStatus::Confirmed).await;

    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["asha@example.com".to_string()]);
    assert!(sent[0].subject.contains("Confirmed"));
    assert!(sent[0].html.contains("0f8fad5b..."));
    assert_eq!(
        outcome(&store).await.unwrap().message(),
        "Booking confirmed! Email sent to asha@example.com"
    );
}
