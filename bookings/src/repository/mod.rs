//! Query surface over the hosted data store
//!
//! Authorization is not checked here. Every call runs with the caller's access
//! token and the store's row-level policies decide what comes back.

use crate::error::RepositoryError;
use crate::types::{AdminBooking, BookingId, BookingStatus, BookingWithCompanion, Companion, UserId};
use std::future::Future;
use std::pin::Pin;

pub mod postgrest;

pub use postgrest::PostgrestRepository;

/// Boxed future returned by [`BookingRepository`] methods
pub type RepositoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Reads and writes the views and the status controller need
pub trait BookingRepository: Send + Sync {
    /// Companions accepting bookings, best rated first
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the store cannot be queried.
    fn list_available_companions(&self) -> RepositoryFuture<'_, Vec<Companion>>;

    /// One customer's bookings with their companion, latest booking date first
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the store cannot be queried.
    fn list_user_bookings(&self, user_id: &UserId) -> RepositoryFuture<'_, Vec<BookingWithCompanion>>;

    /// Every booking with companion name and customer email, newest first
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the store cannot be queried.
    fn list_admin_bookings(&self) -> RepositoryFuture<'_, Vec<AdminBooking>>;

    /// Set one booking's status, unconditionally
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the write is refused or fails.
    fn update_status(
        &self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> RepositoryFuture<'_, ()>;
}
