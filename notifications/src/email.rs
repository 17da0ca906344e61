//! Email provider abstraction
//!
//! A provider takes a fully rendered [`OutgoingEmail`] and returns whatever the
//! upstream service answered, as JSON. The dispatcher relays that body to its
//! caller untouched.

use crate::error::Result;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`EmailProvider::send`]
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<serde_json::Value>> + Send + 'a>>;

/// A rendered message addressed to one or more recipients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    /// `Name <address>` sender
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Transport that delivers [`OutgoingEmail`]s
///
/// Object safe so the dispatcher can hold an `Arc<dyn EmailProvider>` chosen at
/// startup.
pub trait EmailProvider: Send + Sync {
    /// Deliver one email and return the provider's response body
    ///
    /// # Errors
    ///
    /// Returns an error when the message cannot be handed to the provider or the
    /// provider's reply cannot be read.
    fn send(&self, email: OutgoingEmail) -> SendFuture<'_>;

    /// Short provider name for logs and readiness output
    fn name(&self) -> &'static str;
}
