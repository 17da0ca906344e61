//! In-memory store and dispatcher for tests
//!
//! [`InMemoryRepository`] answers the same queries as the hosted store
//! (joins, filters, sort orders) over rows seeded by the test.
//! [`RecordingDispatcher`] keeps every confirmation request it is handed.

use crate::dispatcher::{ConfirmationDispatcher, DispatchFuture};
use crate::error::{DispatchError, RepositoryError};
use crate::repository::{BookingRepository, RepositoryFuture};
use crate::types::{
    AdminBooking, Booking, BookingId, BookingStatus, BookingWithCompanion, Companion, CompanionId,
    EnergyType, PresenceNature, Profile, UserId,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sathi_notifications::{BookingConfirmationRequest, DispatchReceipt};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    companions: Vec<Companion>,
    bookings: Vec<Booking>,
    profiles: Vec<Profile>,
    writes: Vec<(BookingId, BookingStatus)>,
}

/// Store double with the hosted store's query semantics
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding one admin booking, with its companion and profile rows
    #[must_use]
    pub fn with_admin_booking(booking: &AdminBooking) -> Self {
        let repository = Self::new();
        repository.insert_admin_booking(booking);
        repository
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A test that panicked while holding the lock already failed.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Add a companion row
    pub fn insert_companion(&self, companion: Companion) {
        self.tables().companions.push(companion);
    }

    /// Add a booking row
    pub fn insert_booking(&self, booking: Booking) {
        self.tables().bookings.push(booking);
    }

    /// Add a profile row
    pub fn insert_profile(&self, profile: Profile) {
        self.tables().profiles.push(profile);
    }

    /// Add a booking plus whatever companion and profile rows its joins need
    pub fn insert_admin_booking(&self, booking: &AdminBooking) {
        let mut tables = self.tables();
        if let Some(name) = &booking.companion_name {
            if !tables.companions.iter().any(|c| c.id == booking.booking.companion_id) {
                tables
                    .companions
                    .push(sample_companion(booking.booking.companion_id.as_str(), name, Some(4.8)));
            }
        }
        if !tables.profiles.iter().any(|p| p.id == booking.booking.user_id) {
            tables.profiles.push(Profile {
                id: booking.booking.user_id.clone(),
                email: booking.user_email.clone(),
            });
        }
        tables.bookings.push(booking.booking.clone());
    }

    /// Make every read fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Status writes received so far, in order
    #[must_use]
    pub fn writes(&self) -> Vec<(BookingId, BookingStatus)> {
        self.tables().writes.clone()
    }

    /// Current status of a booking row
    #[must_use]
    pub fn status_of(&self, id: &BookingId) -> Option<BookingStatus> {
        self.tables()
            .bookings
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.status)
    }

    fn read_guard(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::RequestFailed("in-memory store set to fail reads".to_string()));
        }
        Ok(())
    }

    fn admin_rows(&self) -> Vec<AdminBooking> {
        let tables = self.tables();
        let mut rows: Vec<AdminBooking> = tables
            .bookings
            .iter()
            .map(|booking| AdminBooking {
                companion_name: tables
                    .companions
                    .iter()
                    .find(|c| c.id == booking.companion_id)
                    .map(|c| c.name.clone()),
                user_email: tables
                    .profiles
                    .iter()
                    .find(|p| p.id == booking.user_id)
                    .and_then(|p| p.email.clone()),
                booking: booking.clone(),
            })
            .collect();
        rows.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
        rows
    }

    fn user_rows(&self, user_id: &UserId) -> Vec<BookingWithCompanion> {
        let tables = self.tables();
        let mut rows: Vec<BookingWithCompanion> = tables
            .bookings
            .iter()
            .filter(|b| &b.user_id == user_id)
            .map(|booking| BookingWithCompanion {
                companion: tables
                    .companions
                    .iter()
                    .find(|c| c.id == booking.companion_id)
                    .cloned(),
                booking: booking.clone(),
            })
            .collect();
        rows.sort_by(|a, b| b.booking.booking_date.cmp(&a.booking.booking_date));
        rows
    }

    fn available_companions(&self) -> Vec<Companion> {
        let mut companions: Vec<Companion> = self
            .tables()
            .companions
            .iter()
            .filter(|c| c.is_available)
            .cloned()
            .collect();
        // Unrated sorts last, like SQL NULLs under DESC NULLS LAST.
        companions.sort_by(|a, b| {
            b.rating
                .unwrap_or(f64::MIN)
                .total_cmp(&a.rating.unwrap_or(f64::MIN))
        });
        companions
    }
}

impl BookingRepository for InMemoryRepository {
    fn list_available_companions(&self) -> RepositoryFuture<'_, Vec<Companion>> {
        Box::pin(async move {
            self.read_guard()?;
            Ok::<_, RepositoryError>(self.available_companions())
        })
    }

    fn list_user_bookings(&self, user_id: &UserId) -> RepositoryFuture<'_, Vec<BookingWithCompanion>> {
        let user_id = user_id.clone();
        Box::pin(async move {
            self.read_guard()?;
            Ok::<_, RepositoryError>(self.user_rows(&user_id))
        })
    }

    fn list_admin_bookings(&self) -> RepositoryFuture<'_, Vec<AdminBooking>> {
        Box::pin(async move {
            self.read_guard()?;
            Ok::<_, RepositoryError>(self.admin_rows())
        })
    }

    fn update_status(
        &self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> RepositoryFuture<'_, ()> {
        let booking_id = booking_id.clone();
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RepositoryError::Api {
                    status: 403,
                    message: "in-memory store set to fail writes".to_string(),
                });
            }

            let mut tables = self.tables();
            tables.writes.push((booking_id.clone(), status));
            // Filtered update: an unknown id matches no rows and is not an error.
            if let Some(row) = tables.bookings.iter_mut().find(|b| b.id == booking_id) {
                row.status = status;
            }
            Ok::<(), RepositoryError>(())
        })
    }
}

/// Dispatcher double that records requests
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    requests: Arc<Mutex<Vec<BookingConfirmationRequest>>>,
    should_fail: Arc<AtomicBool>,
}

impl RecordingDispatcher {
    /// Dispatcher that accepts every request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher that rejects every request
    #[must_use]
    pub fn failing() -> Self {
        let dispatcher = Self::new();
        dispatcher.should_fail.store(true, Ordering::SeqCst);
        dispatcher
    }

    /// Requests received so far, including rejected ones
    #[must_use]
    pub fn requests(&self) -> Vec<BookingConfirmationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl ConfirmationDispatcher for RecordingDispatcher {
    fn dispatch(&self, request: BookingConfirmationRequest) -> DispatchFuture<'_> {
        Box::pin(async move {
            let count = match self.requests.lock() {
                Ok(mut requests) => {
                    requests.push(request);
                    requests.len()
                },
                Err(_) => 0,
            };

            if self.should_fail.load(Ordering::SeqCst) {
                return Err(DispatchError::Rejected {
                    status: 500,
                    message: r#"{"error":"recording dispatcher set to fail"}"#.to_string(),
                });
            }

            Ok(DispatchReceipt {
                success: true,
                email_response: json!({ "id": format!("recorded-{count}") }),
            })
        })
    }
}

/// A companion row with sensible defaults
#[must_use]
pub fn sample_companion(id: &str, name: &str, rating: Option<f64>) -> Companion {
    Companion {
        id: CompanionId::new(id),
        name: name.to_string(),
        avatar_url: None,
        hourly_rate: 1500.0,
        city: "Mumbai".to_string(),
        energy_type: EnergyType::SilentObservant,
        is_available: true,
        is_verified: true,
        rating,
        bio: None,
    }
}

/// An admin booking for `asha@example.com` with companion Meera
///
/// `id` also seeds the dates so bookings built in sequence sort predictably.
#[must_use]
pub fn sample_booking(id: &str, status: BookingStatus) -> AdminBooking {
    let offset = i64::from(id.bytes().fold(0u8, u8::wrapping_add));
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(offset);
    let booking_date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default();

    AdminBooking {
        booking: Booking {
            id: BookingId::new(id),
            companion_id: CompanionId::new("c1"),
            user_id: UserId::new("u1"),
            booking_date,
            start_time: "18:30:00".to_string(),
            duration_hours: 2.0,
            venue_name: "Blue Tokai".to_string(),
            venue_address: "Bandra West, Mumbai".to_string(),
            presence_nature: PresenceNature::new("silent_observant"),
            total_amount: 3000.0,
            status,
            special_notes: None,
            created_at,
        },
        companion_name: Some("Meera".to_string()),
        user_email: Some("asha@example.com".to_string()),
    }
}
